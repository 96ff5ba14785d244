use std::fmt;
use std::str::FromStr;
use ahash::AHashMap;
use cs_core::ModelError;

/// A mass-action reaction between species of a [`ReactionNetwork`].
///
/// Species are referenced by index, each with its stoichiometric
/// coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    name: String,
    reactants: Vec<(usize, u32)>,
    products: Vec<(usize, u32)>,
    rate: f64,
}

/// Number of ways to pick `k` molecules out of `n`.
fn binomial(n: u64, k: u32) -> f64 {
    if n < k as u64 {
        return 0.0;
    }
    (0..k as u64).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

impl Reaction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reactants(&self) -> &[(usize, u32)] {
        &self.reactants
    }

    pub fn products(&self) -> &[(usize, u32)] {
        &self.products
    }

    /// The stochastic rate constant.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Mass-action propensity `k · Π C(n_s, ν_s)` for the given counts.
    pub fn propensity(&self, counts: &[u64]) -> f64 {
        self.reactants.iter()
            .fold(self.rate, |acc, &(s, nu)| acc * binomial(counts[s], nu))
    }

    /// Apply the reaction once. Must only be called when the propensity
    /// is positive.
    pub fn fire(&self, counts: &mut [u64]) {
        for &(s, nu) in &self.reactants {
            debug_assert!(counts[s] >= nu as u64);
            counts[s] = counts[s].saturating_sub(nu as u64);
        }
        for &(s, nu) in &self.products {
            counts[s] += nu as u64;
        }
    }
}

/// Species, their initial molecule counts and the reactions between them.
///
/// Networks are usually written in a small text format, one statement per
/// line:
///
/// ```text
/// # comment
/// E = 50
/// binding: E + S -> ES; 0.01
/// 2 A -> ; 0.5
/// ```
///
/// A reaction is `[name:] side -> side; rate`, where a side is a `+`
/// separated list of optionally prefixed species (`2 A`), possibly empty.
/// An assignment `name = count` sets an initial count. Species are numbered
/// in order of first appearance and start at zero unless assigned.
///
/// # Example
/// ```rust
/// use cs_solvers::ReactionNetwork;
///
/// let network: ReactionNetwork = "A = 10\nA -> B; 0.5".parse().unwrap();
/// assert_eq!(network.species(), &["A", "B"]);
/// assert_eq!(network.initial_counts(), &[10, 0]);
/// assert_eq!(network.reactions()[0].propensity(&[10, 0]), 5.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReactionNetwork {
    species: Vec<String>,
    lookup: AHashMap<String, usize>,
    initial: Vec<u64>,
    reactions: Vec<Reaction>,
}

impl ReactionNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a species (idempotent) and return its index.
    pub fn add_species(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.lookup.get(name) {
            return idx;
        }
        let idx = self.species.len();
        self.species.push(name.to_string());
        self.lookup.insert(name.to_string(), idx);
        self.initial.push(0);
        idx
    }

    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn initial_counts(&self) -> &[u64] {
        &self.initial
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn set_initial(&mut self, name: &str, count: u64) -> Result<(), ModelError> {
        let idx = self.species_index(name)
            .ok_or_else(|| ModelError::UnknownSpecies(name.to_string()))?;
        self.initial[idx] = count;
        Ok(())
    }

    /// Add a reaction, registering any new species. Repeated species on
    /// one side are merged into a single coefficient.
    pub fn add_reaction(
        &mut self,
        name: &str,
        reactants: &[(&str, u32)],
        products: &[(&str, u32)],
        rate: f64,
    ) -> usize {
        let reactants = self.side(reactants);
        let products = self.side(products);
        let name = if name.is_empty() {
            format!("R{}", self.reactions.len() + 1)
        } else {
            name.to_string()
        };
        self.reactions.push(Reaction { name, reactants, products, rate });
        self.reactions.len() - 1
    }

    fn side(&mut self, terms: &[(&str, u32)]) -> Vec<(usize, u32)> {
        let mut side: Vec<(usize, u32)> = Vec::with_capacity(terms.len());
        for &(name, nu) in terms {
            let idx = self.add_species(name);
            match side.iter_mut().find(|(s, _)| *s == idx) {
                Some((_, total)) => *total += nu,
                None => side.push((idx, nu)),
            }
        }
        side
    }

    fn write_side(&self, f: &mut fmt::Formatter<'_>, side: &[(usize, u32)]) -> fmt::Result {
        for (k, &(s, nu)) in side.iter().enumerate() {
            if k > 0 {
                write!(f, " + ")?;
            }
            if nu == 1 {
                write!(f, "{}", self.species[s])?;
            } else {
                write!(f, "{} {}", nu, self.species[s])?;
            }
        }
        Ok(())
    }
}

impl PartialEq for ReactionNetwork {
    fn eq(&self, other: &Self) -> bool {
        // `lookup` is derived from `species`.
        self.species == other.species
            && self.initial == other.initial
            && self.reactions == other.reactions
    }
}

fn is_species_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => (),
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn parse_term(term: &str, line: usize) -> Result<(&str, u32), ModelError> {
    let invalid = |reason: String| ModelError::InvalidReaction { line, reason };
    let term = term.trim();
    if term.is_empty() {
        return Err(invalid("empty term".to_string()));
    }
    let digits = term.find(|c: char| !c.is_ascii_digit()).unwrap_or(term.len());
    let (coefficient, name) = term.split_at(digits);
    let name = name.trim();
    let nu = if coefficient.is_empty() {
        1
    } else {
        coefficient.parse::<u32>()
            .map_err(|_| invalid(format!("invalid coefficient '{}'", coefficient)))?
    };
    if nu == 0 {
        return Err(invalid(format!("zero coefficient in '{}'", term)));
    }
    if !is_species_name(name) {
        return Err(invalid(format!("invalid species name '{}'", name)));
    }
    Ok((name, nu))
}

fn parse_side(side: &str, line: usize) -> Result<Vec<(&str, u32)>, ModelError> {
    let side = side.trim();
    if side.is_empty() {
        return Ok(Vec::new());
    }
    side.split('+').map(|term| parse_term(term, line)).collect()
}

impl FromStr for ReactionNetwork {
    type Err = ModelError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut network = ReactionNetwork::new();

        for (lno, raw) in text.lines().enumerate() {
            let line = lno + 1;
            let statement = raw.split('#').next().unwrap_or("").trim();
            if statement.is_empty() {
                continue;
            }
            let invalid = |reason: &str| ModelError::InvalidReaction {
                line,
                reason: reason.to_string(),
            };

            if let Some((lhs, rhs)) = statement.split_once("->") {
                let (name, lhs) = match lhs.split_once(':') {
                    Some((name, lhs)) => (name.trim(), lhs),
                    None => ("", lhs),
                };
                let (rhs, rate) = rhs.split_once(';').ok_or_else(|| invalid("missing '; rate'"))?;
                let rate: f64 = rate.trim().parse().map_err(|_| invalid("invalid rate"))?;
                if !rate.is_finite() || rate < 0.0 {
                    return Err(invalid("rate must be finite and >= 0"));
                }
                let reactants = parse_side(lhs, line)?;
                let products = parse_side(rhs, line)?;
                network.add_reaction(name, &reactants, &products, rate);
            } else if let Some((name, count)) = statement.split_once('=') {
                let name = name.trim();
                if !is_species_name(name) {
                    return Err(invalid("invalid species name"));
                }
                let count: u64 = count.trim().parse().map_err(|_| invalid("invalid count"))?;
                network.add_species(name);
                network.set_initial(name, count)?;
            } else {
                return Err(invalid("expected a reaction or an assignment"));
            }
        }
        Ok(network)
    }
}

impl fmt::Display for ReactionNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, count) in self.species.iter().zip(&self.initial) {
            writeln!(f, "{} = {}", name, count)?;
        }
        for rxn in &self.reactions {
            write!(f, "{}: ", rxn.name)?;
            self.write_side(f, &rxn.reactants)?;
            write!(f, " -> ")?;
            self.write_side(f, &rxn.products)?;
            writeln!(f, "; {}", rxn.rate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ENZYME: &str = "
        # Michaelis-Menten
        E = 50
        S = 500
        binding: E + S -> ES; 0.01
        unbinding: ES -> E + S; 0.1
        catalysis: ES -> E + P; 0.1
    ";

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(5, 0), 1.0);
        assert_eq!(binomial(5, 1), 5.0);
        assert_eq!(binomial(5, 2), 10.0);
        assert_eq!(binomial(1, 2), 0.0);
    }

    #[test]
    fn test_parse_enzyme_network() {
        let network: ReactionNetwork = ENZYME.parse().unwrap();
        assert_eq!(network.species(), &["E", "S", "ES", "P"]);
        assert_eq!(network.initial_counts(), &[50, 500, 0, 0]);
        assert_eq!(network.reactions().len(), 3);

        let binding = &network.reactions()[0];
        assert_eq!(binding.name(), "binding");
        assert_eq!(binding.reactants(), &[(0, 1), (1, 1)]);
        assert_eq!(binding.products(), &[(2, 1)]);
        assert_relative_eq!(binding.propensity(network.initial_counts()), 250.0);
        assert_eq!(network.reactions()[2].products(), &[(0, 1), (3, 1)]);
    }

    #[test]
    fn test_parse_coefficients_and_empty_sides() {
        let network: ReactionNetwork = "2 A + B -> C; 0.5\nA + A -> ; 1\n-> B; 3".parse().unwrap();
        let rxns = network.reactions();
        assert_eq!(rxns[0].reactants(), &[(0, 2), (1, 1)]);
        assert_relative_eq!(rxns[0].propensity(&[4, 3, 0]), 9.0);
        assert_eq!(rxns[1].reactants(), &[(0, 2)]);
        assert!(rxns[1].products().is_empty());
        assert_eq!(rxns[1].name(), "R2");
        assert!(rxns[2].reactants().is_empty());
        assert_relative_eq!(rxns[2].propensity(&[0, 0, 0]), 3.0);
    }

    #[test]
    fn test_fire() {
        let network: ReactionNetwork = "2 A + B -> 3 C; 1".parse().unwrap();
        let mut counts = vec![4, 3, 0];
        network.reactions()[0].fire(&mut counts);
        assert_eq!(counts, vec![2, 2, 3]);
    }

    #[test]
    fn test_parse_errors() {
        let err = |text: &str| text.parse::<ReactionNetwork>().unwrap_err();
        assert!(matches!(err("A -> B"), ModelError::InvalidReaction { line: 1, .. }));
        assert!(matches!(err("A -> B; fast"), ModelError::InvalidReaction { line: 1, .. }));
        assert!(matches!(err("A -> B; -1"), ModelError::InvalidReaction { line: 1, .. }));
        assert!(matches!(err("A = 1\nA + -> B; 1"), ModelError::InvalidReaction { line: 2, .. }));
        assert!(matches!(err("0 A -> B; 1"), ModelError::InvalidReaction { .. }));
        assert!(matches!(err("3 = 4"), ModelError::InvalidReaction { .. }));
        assert!(matches!(err("A = lots"), ModelError::InvalidReaction { .. }));
        assert!(matches!(err("\n\nnonsense"), ModelError::InvalidReaction { line: 3, .. }));
    }

    #[test]
    fn test_set_initial_unknown_species() {
        let mut network = ReactionNetwork::new();
        assert_eq!(
            network.set_initial("X", 3),
            Err(ModelError::UnknownSpecies("X".to_string()))
        );
    }

    #[test]
    fn test_display_roundtrip() {
        let network: ReactionNetwork = ENZYME.parse().unwrap();
        let text = network.to_string();
        assert!(text.contains("binding: E + S -> ES; 0.01"));
        let reparsed: ReactionNetwork = text.parse().unwrap();
        assert_eq!(reparsed, network);
    }
}
