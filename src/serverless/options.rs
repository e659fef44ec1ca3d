// src/serverless/options.rs

//! Translating `resource_config` into `serverless create` flags.

use tracing::warn;

use crate::config::ResourceConfig;

/// Flags `serverless create` accepts from `resource_config`, in emit order.
pub const SERVICE_FLAGS: [&str; 5] = [
    "--name",
    "--template",
    "--template-url",
    "--template-path",
    "--path",
];

/// Each flag of [`SERVICE_FLAGS`] paired with the field it is read from.
fn flag_values(resource: &ResourceConfig) -> [(&'static str, Option<&str>); 5] {
    [
        ("--name", resource.name.as_deref()),
        ("--template", resource.template.as_deref()),
        ("--template-url", resource.template_url.as_deref()),
        ("--template-path", resource.template_path.as_deref()),
        ("--path", resource.path.as_deref()),
    ]
}

/// Build `--flag value` pairs from the allow-listed keys.
///
/// Empty values are skipped. Keys with no flag mapping are logged and never
/// passed through.
pub fn resource_options(resource: &ResourceConfig) -> Vec<String> {
    let mut options = Vec::new();

    for (flag, value) in flag_values(resource) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            options.push(flag.to_string());
            options.push(value.to_string());
        }
    }

    for key in resource.extra.keys() {
        warn!(key = %key, "resource_config key has no serverless flag; ignoring");
    }

    options
}
