pub mod transforms;
pub mod units;

pub use transforms::{frequency_domain_from_bandwidth, DomainDescriptor};
pub use units::{convert_units, parse_quantity, split_num_units, unit_scale, UnitFamily};
