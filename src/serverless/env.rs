// src/serverless/env.rs

use std::collections::BTreeMap;

use crate::config::{ClientConfig, ServerlessConfig};
use crate::types::Provider;

pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Environment overlay for a `serverless` invocation.
///
/// Provider credentials first, then `serverless_config.env` on top. The
/// runner adds the scratch-directory variables last.
pub fn command_environment(
    client: &ClientConfig,
    serverless: &ServerlessConfig,
) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();

    if let (Some(Provider::Aws), Some(creds)) = (client.provider(), client.credentials.as_ref()) {
        env.insert(AWS_ACCESS_KEY_ID.to_string(), creds.key.clone());
        env.insert(AWS_SECRET_ACCESS_KEY.to_string(), creds.secret.clone());
    }

    for (key, value) in serverless.env.iter() {
        env.insert(key.clone(), value.clone());
    }

    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    fn client(provider: &str) -> ClientConfig {
        ClientConfig {
            provider: Some(provider.to_string()),
            credentials: Some(Credentials {
                key: "secret_name".to_string(),
                secret: "super_secret".to_string(),
            }),
        }
    }

    #[test]
    fn aws_credentials_are_exported() {
        let env = command_environment(&client("aws"), &ServerlessConfig::default());
        assert_eq!(env[AWS_ACCESS_KEY_ID], "secret_name");
        assert_eq!(env[AWS_SECRET_ACCESS_KEY], "super_secret");
    }

    #[test]
    fn unknown_provider_exports_nothing() {
        let env = command_environment(&client("foobar"), &ServerlessConfig::default());
        assert!(env.is_empty());
    }

    #[test]
    fn custom_env_overrides_credentials() {
        let mut sls = ServerlessConfig::default();
        sls.env
            .insert(AWS_ACCESS_KEY_ID.to_string(), "override".to_string());
        sls.env.insert("SLS_DEBUG".to_string(), "*".to_string());

        let env = command_environment(&client("aws"), &sls);
        assert_eq!(env[AWS_ACCESS_KEY_ID], "override");
        assert_eq!(env["SLS_DEBUG"], "*");
    }
}
