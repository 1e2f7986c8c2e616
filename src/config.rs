//! Constants shared by the template index and the vendor façades.
//!
//! Command strings are the exact keys used for template lookup, so they
//! must match the `command` field of the template index entries verbatim.

/// Template index document version understood by this crate.
pub const TEMPLATE_INDEX_VERSION: u32 = 1;

/// Vendor key used for Juniper templates.
pub const JUNIPER_VENDOR: &str = "Juniper";

/// Vendor key used for Cisco templates.
pub const CISCO_VENDOR: &str = "Cisco";

/// Juniper command listing configured login users.
pub const JUNIPER_SHOW_LOGIN: &str = "show configuration system login";

/// Juniper command reporting chassis hardware.
pub const JUNIPER_SHOW_CHASSIS_HARDWARE: &str = "show chassis hardware";

/// Juniper command reporting the running software version.
pub const JUNIPER_SHOW_VERSION: &str = "show version";

/// Juniper command listing the ARP table without name resolution.
pub const JUNIPER_SHOW_ARP: &str = "show arp no-resolve";

/// Juniper command listing IS-IS adjacencies.
pub const JUNIPER_SHOW_ISIS_ADJACENCY: &str = "show isis adjacency";

/// Hardware model pattern: a model family plus numeric suffix.
pub const JUNIPER_MODEL_PATTERN: &str = r"(?P<model>(?:MX|PTX)[0-9]+)";

/// Running version pattern: major, minor, release train and build.
pub const JUNIPER_VERSION_PATTERN: &str =
    r"(?P<major>\d+)\.(?P<minor>\d+)(?P<train>\w)(?P<build>\d+)";
