mod dns;
mod geo;
mod scan;
mod whois;

pub use dns::*;
pub use geo::*;
pub use scan::*;
pub use whois::*;
