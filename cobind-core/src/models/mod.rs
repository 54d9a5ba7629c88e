pub mod cluster;
pub mod point;
pub mod pwm;
pub mod region;
pub mod roster;
pub mod site;

// re-export for cleaner imports
pub use self::cluster::Cluster;
pub use self::point::GenomicPoint;
pub use self::pwm::PositionWeightMatrix;
pub use self::region::Region;
pub use self::roster::{Factor, FactorRoster};
pub use self::site::Site;
