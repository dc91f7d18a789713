//! Shared field checks behind the `Validate` impls.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crosswire_core::{Result, WireError};

/// Upper bound on a config id's length.
pub const MAX_CONFIG_ID_LEN: usize = 512;

type Pattern = LazyLock<std::result::Result<Regex, regex::Error>>;

/// RFC 5322 addr-spec, case-insensitive.
static EMAIL: Pattern = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)^(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*"#,
        r#"|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")"#,
        r#"@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?"#,
        r#"|\[(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}"#,
        r#"(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9]"#,
        r#"|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"#,
    ))
});

static SNS_TOPIC_ARN: Pattern = LazyLock::new(|| {
    Regex::new(r"^arn:aws(-[^:]+)?:sns:[a-zA-Z0-9-]+:[0-9]{12}:[a-zA-Z0-9_-]+$")
});

static IAM_ROLE_ARN: Pattern = LazyLock::new(|| {
    Regex::new(r"^arn:aws(-[^:]+)?:iam::[0-9]{12}:[a-zA-Z0-9_+=,.@/-]+$")
});

static CONFIG_ID: Pattern = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/_-]+$"));

fn invalid(msg: String) -> WireError {
    WireError::InvalidValue(msg)
}

fn is_match(pattern: &Pattern, value: &str) -> Result<bool> {
    match &**pattern {
        Ok(re) => Ok(re.is_match(value)),
        Err(e) => Err(WireError::Config(format!("validation pattern: {e}"))),
    }
}

pub fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn url(field: &str, value: &str) -> Result<()> {
    non_empty(field, value)?;
    let parsed =
        Url::parse(value).map_err(|e| invalid(format!("{field} `{value}` is not a url: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("{field} must be an http or https url")));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid(format!("{field} has no host")));
    }
    Ok(())
}

pub fn email(field: &str, value: &str) -> Result<()> {
    if !is_match(&EMAIL, value)? {
        return Err(invalid(format!("{field} `{value}` is not an email address")));
    }
    Ok(())
}

/// `arn:aws[-partition]:sns:<region>:<12-digit account>:<topic>`
pub fn sns_arn(field: &str, value: &str) -> Result<()> {
    if !is_match(&SNS_TOPIC_ARN, value)? {
        return Err(invalid(format!("{field} `{value}` is not an SNS topic ARN")));
    }
    Ok(())
}

/// `arn:aws[-partition]:iam::<12-digit account>:<resource>`
pub fn iam_role_arn(field: &str, value: &str) -> Result<()> {
    if !is_match(&IAM_ROLE_ARN, value)? {
        return Err(invalid(format!("{field} `{value}` is not an IAM role ARN")));
    }
    Ok(())
}

pub fn config_id(value: &str) -> Result<()> {
    if value.len() > MAX_CONFIG_ID_LEN || !is_match(&CONFIG_ID, value)? {
        return Err(invalid(format!(
            "config id `{value}` must be 1..={MAX_CONFIG_ID_LEN} chars of [A-Za-z0-9+/_-]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls() {
        assert!(url("url", "https://hooks.example.com/x").is_ok());
        assert!(url("url", "http://h").is_ok());
        assert!(url("url", "https://h:8443/path?q=1").is_ok());
        assert!(url("url", "ftp://h").is_err());
        assert!(url("url", "https://").is_err());
        assert!(url("url", "").is_err());
        assert!(url("url", "https://exa mple.com/x").is_err());
        assert!(url("url", "https://example.com:99999/x").is_err());
        assert!(url("url", "https://example.com:port/x").is_err());
        assert!(url("url", "hooks.example.com/x").is_err());
    }

    #[test]
    fn arns() {
        assert!(sns_arn("topic_arn", "arn:aws:sns:us-west-2:012345678901:topic").is_ok());
        assert!(sns_arn("topic_arn", "arn:aws-cn:sns:cn-north-1:012345678901:t").is_ok());
        assert!(sns_arn("topic_arn", "arn:aws:sqs:us-west-2:012345678901:q").is_err());
        assert!(sns_arn("topic_arn", "arn:aws:sns:us-west-2:topic").is_err());
        assert!(sns_arn("topic_arn", "arn:aws:sns:us-west-2:1234:topic").is_err());
        assert!(sns_arn("topic_arn", "arn:aws:sns:us-west-2:012345678901:a:b").is_err());
    }

    #[test]
    fn role_arns() {
        assert!(iam_role_arn("role_arn", "arn:aws:iam::012345678901:role/notify").is_ok());
        assert!(iam_role_arn("role_arn", "arn:aws-us-gov:iam::012345678901:role/a.b@c").is_ok());
        assert!(iam_role_arn("role_arn", "not-an-arn").is_err());
        assert!(iam_role_arn("role_arn", "arn:aws:iam:us-east-1:012345678901:role/x").is_err());
        assert!(iam_role_arn("role_arn", "arn:aws:sns:us-east-1:012345678901:topic").is_err());
    }

    #[test]
    fn ids() {
        assert!(config_id("config-1_A").is_ok());
        assert!(config_id("dGVzdA+/").is_ok());
        assert!(config_id("").is_err());
        assert!(config_id("has space").is_err());
        assert!(config_id("semi;colon").is_err());
        assert!(config_id(&"a".repeat(MAX_CONFIG_ID_LEN)).is_ok());
        assert!(config_id(&"a".repeat(MAX_CONFIG_ID_LEN + 1)).is_err());
    }

    #[test]
    fn emails() {
        assert!(email("recipient", "a@b.c").is_ok());
        assert!(email("recipient", "First.Last+tag@Mail.Example.COM").is_ok());
        assert!(email("recipient", "ops@[10.0.0.1]").is_ok());
        assert!(email("recipient", "@b").is_err());
        assert!(email("recipient", "plain").is_err());
        assert!(email("recipient", "a@b@c").is_err());
        assert!(email("recipient", "a b@c").is_err());
        assert!(email("recipient", "x y@@z").is_err());
        assert!(email("recipient", "a@b.c trailing").is_err());
    }
}
