// Adapters layer: concrete implementations behind the domain ports (technologies, report output).

pub mod report;
pub mod technology;
