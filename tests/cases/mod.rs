pub mod ammonium;
pub mod carbonates;
pub mod hydrates;
pub mod nitrates;
pub mod rejections;
pub mod substitution;
