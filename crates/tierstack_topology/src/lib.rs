//! # tierstack_topology
//!
//! The two-tier web/api deployment: a security group, one web and one api
//! instance, an internet-facing application load balancer with a target
//! group per tier, a listener forwarding to the web tier by default and a
//! path rule sending `/api/*` to the api tier.
//!
//! ## Example
//!
//! ```rust
//! use tierstack_topology::{render, TopologyConfig};
//!
//! let json = render(&TopologyConfig::default(), false).unwrap();
//! assert!(json.starts_with('{'));
//! ```

pub mod builder;
pub mod config;
pub mod error;

pub use builder::{boot_script, build_template};
pub use config::{HealthCheckConfig, TierConfig, TopologyConfig};
pub use error::{TopologyError, TopologyResult};

/// Build the template and serialize it, pretty or compact.
pub fn render(config: &TopologyConfig, compact: bool) -> TopologyResult<String> {
    let template = build_template(config)?;
    let json = if compact {
        template.to_json_compact()?
    } else {
        template.to_json()?
    };
    Ok(json)
}
