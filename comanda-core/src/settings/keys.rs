//! Built-in configuration keys and their defaults

use shared::models::ConfigKind;

pub const USE_TABLES: &str = "use_tables";
pub const USE_CATEGORIES: &str = "use_categories";
pub const USE_OBSERVATIONS: &str = "use_observations";
pub const GENERATE_TICKETS: &str = "generate_tickets";
pub const BUSINESS_NAME: &str = "business_name";
pub const CURRENCY: &str = "currency";
pub const AUTO_REFRESH_TABLES: &str = "auto_refresh_tables";
pub const SHOW_MENU_PRICES: &str = "show_menu_prices";
pub const ALLOW_TABLELESS_ORDERS: &str = "allow_tableless_orders";
pub const SHOW_ORDER_CONTROL: &str = "show_order_control";
pub const USE_USER_SYSTEM: &str = "use_user_system";
pub const DEFAULT_USER: &str = "default_user";

/// A built-in key with its declared kind and default raw value
#[derive(Debug, Clone, Copy)]
pub struct SettingDefault {
    pub key: &'static str,
    pub kind: ConfigKind,
    pub value: &'static str,
    pub description: &'static str,
}

const fn flag(key: &'static str, value: &'static str, description: &'static str) -> SettingDefault {
    SettingDefault {
        key,
        kind: ConfigKind::Bool,
        value,
        description,
    }
}

const fn text(key: &'static str, value: &'static str, description: &'static str) -> SettingDefault {
    SettingDefault {
        key,
        kind: ConfigKind::Text,
        value,
        description,
    }
}

pub const DEFAULTS: &[SettingDefault] = &[
    flag(USE_TABLES, "true", "Assign orders to dining tables"),
    flag(USE_CATEGORIES, "true", "Group the menu by category"),
    flag(USE_OBSERVATIONS, "true", "Allow free-text observations on orders"),
    flag(GENERATE_TICKETS, "true", "Write a ticket for every submitted order"),
    text(BUSINESS_NAME, "Restaurant", "Name printed on tickets"),
    text(CURRENCY, "$", "Currency symbol"),
    flag(AUTO_REFRESH_TABLES, "true", "Refresh the table board periodically"),
    flag(SHOW_MENU_PRICES, "true", "Show prices on menu buttons"),
    flag(ALLOW_TABLELESS_ORDERS, "false", "Allow orders without a table (takeaway)"),
    flag(SHOW_ORDER_CONTROL, "true", "Show the order control panel"),
    flag(USE_USER_SYSTEM, "true", "Require login"),
    text(DEFAULT_USER, "admin", "User for the session when login is disabled"),
];

/// Declared default for a built-in key
pub fn default_for(key: &str) -> Option<&'static SettingDefault> {
    DEFAULTS.iter().find(|d| d.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ConfigValue;

    #[test]
    fn test_defaults_parse_as_declared() {
        for d in DEFAULTS {
            let value = ConfigValue::parse(d.kind, d.value).unwrap();
            assert_eq!(value.kind(), d.kind, "{}", d.key);
        }
    }

    #[test]
    fn test_default_lookup() {
        assert_eq!(default_for(ALLOW_TABLELESS_ORDERS).unwrap().value, "false");
        assert!(default_for("unknown").is_none());
    }
}
