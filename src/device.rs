//! Per-vendor device capabilities built on the parsers.
//!
//! [`DeviceCapabilities`] is the uniform operation set every vendor
//! supports. A vendor type runs the command through its [`Transport`], hands
//! the raw output to the matching parser, and reports output that does not
//! fit the expected shape as [`ShapeError::UnexpectedFormat`].

use std::sync::Arc;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::adjacency::{AdjacencyRecord, parse_adjacency};
use crate::config::{
    JUNIPER_MODEL_PATTERN, JUNIPER_SHOW_ARP, JUNIPER_SHOW_CHASSIS_HARDWARE,
    JUNIPER_SHOW_ISIS_ADJACENCY, JUNIPER_SHOW_LOGIN, JUNIPER_SHOW_VERSION, JUNIPER_VENDOR,
    JUNIPER_VERSION_PATTERN,
};
use crate::error::{Result, ShapeError};
use crate::extract::FieldPattern;
use crate::table::{TableRow, TemplateIndex, parse_table};
use crate::templates::builtin_index;
use crate::transport::Transport;

/// Running software version split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunningVersion {
    pub major: String,
    pub minor: String,
    pub train: String,
    pub build: String,
}

/// Operations every supported vendor provides.
pub trait DeviceCapabilities {
    /// Returns true if a login user named `username` is configured.
    fn is_user_configured(&self, username: &str) -> Result<bool>;

    /// Hardware model, e.g. `MX480`.
    fn fetch_model(&self) -> Result<String>;

    /// Running software version.
    fn fetch_running_version(&self) -> Result<RunningVersion>;

    /// ARP table rows in device order.
    fn fetch_arp_table(&self) -> Result<Vec<TableRow>>;

    /// IS-IS adjacencies in device order.
    fn fetch_isis_adjacency(&self) -> Result<Vec<AdjacencyRecord>>;
}

/// Juniper JunOS device.
pub struct JuniperDevice<T: Transport> {
    transport: T,
    templates: Arc<TemplateIndex>,
    model: FieldPattern,
    version: FieldPattern,
}

impl<T: Transport> JuniperDevice<T> {
    /// Create a device using the built-in template index.
    pub fn new(transport: T) -> Result<Self> {
        Self::with_templates(transport, builtin_index()?)
    }

    /// Create a device using a caller-supplied template index.
    ///
    /// Patterns are compiled and the ARP template is looked up here, so a
    /// defective configuration fails before any command is sent.
    pub fn with_templates(transport: T, templates: Arc<TemplateIndex>) -> Result<Self> {
        templates.get(JUNIPER_SHOW_ARP, JUNIPER_VENDOR)?;
        Ok(Self {
            transport,
            templates,
            model: FieldPattern::with_groups(JUNIPER_MODEL_PATTERN, &["model"])?,
            version: FieldPattern::with_groups(
                JUNIPER_VERSION_PATTERN,
                &["major", "minor", "train", "build"],
            )?,
        })
    }

    /// The transport used to reach the device.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn run(&self, command: &str) -> Result<String> {
        debug!("{JUNIPER_VENDOR}: running '{command}'");
        Ok(self.transport.fetch(command)?)
    }
}

/// Wraps data-shape failures so callers see which command and vendor drifted.
fn unexpected_format(command: &str) -> impl FnOnce(ShapeError) -> ShapeError + '_ {
    move |err| {
        if err.is_data_error() {
            ShapeError::UnexpectedFormat {
                vendor: JUNIPER_VENDOR.to_string(),
                command: command.to_string(),
                source: Box::new(err),
            }
        } else {
            err
        }
    }
}

impl<T: Transport> DeviceCapabilities for JuniperDevice<T> {
    fn is_user_configured(&self, username: &str) -> Result<bool> {
        let output = self.run(JUNIPER_SHOW_LOGIN)?;
        Ok(output.contains(&format!("user {username}")))
    }

    fn fetch_model(&self) -> Result<String> {
        let output = self.run(JUNIPER_SHOW_CHASSIS_HARDWARE)?;
        let mut fields = self
            .model
            .extract(&output)
            .map_err(unexpected_format(JUNIPER_SHOW_CHASSIS_HARDWARE))?;
        Ok(fields.swap_remove("model").unwrap_or_default())
    }

    fn fetch_running_version(&self) -> Result<RunningVersion> {
        let output = self.run(JUNIPER_SHOW_VERSION)?;
        let mut fields = self
            .version
            .extract(&output)
            .map_err(unexpected_format(JUNIPER_SHOW_VERSION))?;
        let mut take = |name: &str| fields.swap_remove(name).unwrap_or_default();
        Ok(RunningVersion {
            major: take("major"),
            minor: take("minor"),
            train: take("train"),
            build: take("build"),
        })
    }

    fn fetch_arp_table(&self) -> Result<Vec<TableRow>> {
        let output = self.run(JUNIPER_SHOW_ARP)?;
        parse_table(JUNIPER_SHOW_ARP, JUNIPER_VENDOR, &output, &self.templates)
            .map_err(unexpected_format(JUNIPER_SHOW_ARP))
    }

    fn fetch_isis_adjacency(&self) -> Result<Vec<AdjacencyRecord>> {
        let output = self.run(JUNIPER_SHOW_ISIS_ADJACENCY)?;
        parse_adjacency(&output).map_err(unexpected_format(JUNIPER_SHOW_ISIS_ADJACENCY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::StaticTransport;

    fn device(transport: StaticTransport) -> JuniperDevice<StaticTransport> {
        JuniperDevice::new(transport).expect("device should build")
    }

    #[test]
    fn user_presence_is_substring_containment() {
        let dev = device(StaticTransport::new().with_output(
            JUNIPER_SHOW_LOGIN,
            "user admin {\n    class super-user;\n}\nuser ops {\n    class read-only;\n}\n",
        ));
        assert!(dev.is_user_configured("admin").expect("admin"));
        assert!(dev.is_user_configured("ops").expect("ops"));
        assert!(!dev.is_user_configured("guest").expect("guest"));
    }

    #[test]
    fn model_is_first_model_in_output() {
        let dev = device(StaticTransport::new().with_output(
            JUNIPER_SHOW_CHASSIS_HARDWARE,
            "Hardware inventory:\nItem             Version  Part number  Serial number     Description\nChassis                                JN11F2B4AAFA      MX480\n",
        ));
        assert_eq!(dev.fetch_model().expect("model"), "MX480");
    }

    #[test]
    fn version_is_split_into_parts() {
        let dev = device(
            StaticTransport::new()
                .with_output(JUNIPER_SHOW_VERSION, "Hostname: edge1\nModel: mx480\nJunos: 21.4R1.12\n"),
        );
        assert_eq!(
            dev.fetch_running_version().expect("version"),
            RunningVersion {
                major: "21".to_string(),
                minor: "4".to_string(),
                train: "R".to_string(),
                build: "1".to_string(),
            }
        );
    }

    #[test]
    fn unmatched_output_is_reported_as_format_drift() {
        let dev = device(StaticTransport::new().with_output(JUNIPER_SHOW_CHASSIS_HARDWARE, "QFX5100"));
        let err = dev.fetch_model().expect_err("no model");
        assert_eq!(
            err.to_string(),
            "output of 'show chassis hardware' did not match the expected format for Juniper"
        );
        match err {
            ShapeError::UnexpectedFormat { source, .. } => {
                assert!(matches!(*source, ShapeError::NoMatch { .. }));
            }
            other => panic!("unexpected error type: {other}"),
        }
    }

    #[test]
    fn transport_failure_passes_through() {
        let dev = device(StaticTransport::new());
        let err = dev.fetch_running_version().expect_err("no output");
        assert!(matches!(err, ShapeError::Transport(TransportError::NoOutput(_))));
    }

    #[test]
    fn adjacency_lex_error_is_wrapped() {
        let dev = device(StaticTransport::new().with_output(
            JUNIPER_SHOW_ISIS_ADJACENCY,
            "Interface System L State Hold (secs) SNPA\n",
        ));
        let err = dev.fetch_isis_adjacency().expect_err("header is not a record");
        match err {
            ShapeError::UnexpectedFormat { command, source, .. } => {
                assert_eq!(command, JUNIPER_SHOW_ISIS_ADJACENCY);
                assert!(matches!(*source, ShapeError::LexError { line: 1, .. }));
            }
            other => panic!("unexpected error type: {other}"),
        }
    }

    #[test]
    fn index_without_arp_template_is_rejected_at_construction() {
        let err = match JuniperDevice::with_templates(StaticTransport::new(), Arc::new(TemplateIndex::new())) {
            Ok(_) => panic!("construction should fail"),
            Err(err) => err,
        };
        assert!(matches!(err, ShapeError::TemplateNotFound { .. }));
    }
}
