//! Notification enums. Declared order is the binary ordinal; append only.

use crosswire_core::WireEnum;

/// Kind of a notification config, and tag of its channel variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigType {
    None,
    Slack,
    Chime,
    Webhook,
    Email,
    Sns,
    SesAccount,
    SmtpAccount,
    EmailGroup,
    MicrosoftTeams,
    Mattermost,
}

impl WireEnum for ConfigType {
    const NAME: &'static str = "ConfigType";
    const VALUES: &'static [Self] = &[
        ConfigType::None,
        ConfigType::Slack,
        ConfigType::Chime,
        ConfigType::Webhook,
        ConfigType::Email,
        ConfigType::Sns,
        ConfigType::SesAccount,
        ConfigType::SmtpAccount,
        ConfigType::EmailGroup,
        ConfigType::MicrosoftTeams,
        ConfigType::Mattermost,
    ];

    fn tag(self) -> &'static str {
        match self {
            ConfigType::None => "none",
            ConfigType::Slack => "slack",
            ConfigType::Chime => "chime",
            ConfigType::Webhook => "webhook",
            ConfigType::Email => "email",
            ConfigType::Sns => "sns",
            ConfigType::SesAccount => "ses_account",
            ConfigType::SmtpAccount => "smtp_account",
            ConfigType::EmailGroup => "email_group",
            ConfigType::MicrosoftTeams => "microsoft_teams",
            ConfigType::Mattermost => "mattermost",
        }
    }

    fn fallback() -> Option<Self> {
        Some(ConfigType::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityType {
    None,
    High,
    Info,
    Critical,
}

impl WireEnum for SeverityType {
    const NAME: &'static str = "SeverityType";
    const VALUES: &'static [Self] = &[
        SeverityType::None,
        SeverityType::High,
        SeverityType::Info,
        SeverityType::Critical,
    ];

    fn tag(self) -> &'static str {
        match self {
            SeverityType::None => "none",
            SeverityType::High => "high",
            SeverityType::Info => "info",
            SeverityType::Critical => "critical",
        }
    }

    fn fallback() -> Option<Self> {
        Some(SeverityType::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethodType {
    #[default]
    Post,
    Put,
    Patch,
}

impl WireEnum for HttpMethodType {
    const NAME: &'static str = "HttpMethodType";
    const VALUES: &'static [Self] = &[
        HttpMethodType::Post,
        HttpMethodType::Put,
        HttpMethodType::Patch,
    ];

    fn tag(self) -> &'static str {
        match self {
            HttpMethodType::Post => "POST",
            HttpMethodType::Put => "PUT",
            HttpMethodType::Patch => "PATCH",
        }
    }

    fn fallback() -> Option<Self> {
        Some(HttpMethodType::Post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_follow_declaration_order() {
        assert_eq!(ConfigType::None.ordinal(), 0);
        assert_eq!(ConfigType::Mattermost.ordinal(), 10);
        assert_eq!(SeverityType::from_ordinal(3), Some(SeverityType::Critical));
        assert_eq!(HttpMethodType::from_ordinal(3), None);
        assert_eq!(HttpMethodType::from_ordinal(-1), None);
    }

    #[test]
    fn tags_round_trip() {
        for t in ConfigType::VALUES {
            assert_eq!(ConfigType::from_tag(t.tag()), Some(*t));
        }
        assert_eq!(ConfigType::from_tag("pager"), None);
    }
}
