mod oregonator;
mod lotka_volterra;
mod sir;
mod ppv;
mod brusselator;

pub use oregonator::*;
pub use lotka_volterra::*;
pub use sir::*;
pub use ppv::*;
pub use brusselator::*;
