//! # tierstack_template
//!
//! CloudFormation template object model for tierstack.
//!
//! This crate holds everything that is not specific to one topology:
//! intrinsic expressions, parameters, mappings, typed resources, outputs,
//! the [`Template`] container with its JSON serialization, and a reference
//! checker that works on any parsed template document.
//!
//! ## Example
//!
//! ```rust
//! use tierstack_template::{Output, Parameter, ParameterType, Template};
//!
//! let mut template = Template::new()
//!     .with_version("2010-09-09")
//!     .with_description("Example");
//!
//! let vpc = template
//!     .add_parameter("VpcId", Parameter::new(ParameterType::VpcId))
//!     .unwrap();
//!
//! template
//!     .add_output("Vpc", Output::new(vpc.reference()))
//!     .unwrap();
//!
//! let json = template.to_json().unwrap();
//! assert!(json.contains("\"Ref\": \"VpcId\""));
//! ```

pub mod error;
pub mod intrinsic;
pub mod parameter;
pub mod resource;
pub mod template;
pub mod validator;

pub use error::{TemplateError, TemplateResult};
pub use intrinsic::{Expr, PseudoParameter};
pub use parameter::{Parameter, ParameterType};
pub use resource::{
    Action, IngressRule, Instance, Listener, ListenerRule, LoadBalancer, Matcher, Resource,
    RuleCondition, SecurityGroup, TargetDescription, TargetGroup,
};
pub use template::{LogicalName, Mapping, Output, Template};
pub use validator::{ReferenceValidator, ValidationResult};
