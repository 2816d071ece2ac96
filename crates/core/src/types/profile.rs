//! User profile model.
//!
//! The profile is a single locally persisted record: identity fields plus
//! shipping addresses, payment methods, and notification settings. Every
//! mutation rewrites the whole record, so these types carry the merge and
//! default-exclusivity rules as pure operations; the session layer only
//! handles locking and persistence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::{AddressId, PaymentMethodId};

/// The persisted user profile record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Saved shipping addresses.
    #[serde(default)]
    pub shipping_addresses: Vec<ShippingAddress>,
    /// Saved payment methods.
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    /// Notification preferences.
    #[serde(default)]
    pub notification_settings: NotificationSettings,
}

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Locally minted ID (UUID v4).
    pub id: AddressId,
    /// Recipient name.
    pub name: String,
    /// Street address.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zip: String,
    /// Country.
    pub country: String,
    /// Contact phone for delivery.
    pub phone: String,
    /// Whether this is the default shipping address. At most one address
    /// carries the flag at a time.
    #[serde(default)]
    pub is_default: bool,
}

/// Caller-supplied fields for a new shipping address; the profile store
/// mints the ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddressInput {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    #[serde(default)]
    pub is_default: bool,
}

/// A saved payment method.
///
/// Forms only validate field presence/format; no gateway integration exists,
/// so the card fields are stored as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Locally minted ID (UUID v4).
    pub id: PaymentMethodId,
    /// Card number as entered.
    pub card_number: String,
    /// Name on the card.
    pub card_holder: String,
    /// Expiry in MM/YY form.
    pub expiry: String,
    /// Card network (e.g. "visa").
    pub card_type: String,
    /// Whether this is the default payment method. At most one method
    /// carries the flag at a time.
    #[serde(default)]
    pub is_default: bool,
}

/// Caller-supplied fields for a new payment method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodInput {
    pub card_number: String,
    pub card_holder: String,
    pub expiry: String,
    pub card_type: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Free-form notification preferences (setting name to on/off).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationSettings(pub BTreeMap<String, bool>);

impl NotificationSettings {
    /// Shallow-merge `partial` into the settings map, overwriting existing
    /// keys and keeping the rest.
    pub fn merge(&mut self, partial: BTreeMap<String, bool>) {
        self.0.extend(partial);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }
}

/// Partial identity update applied by `update_profile`: present fields
/// overwrite, absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UserProfile {
    /// Shallow-merge a patch into the identity fields.
    pub fn apply_patch(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
    }

    /// Append a new shipping address with a fresh ID, enforcing that at most
    /// one address keeps `is_default`.
    pub fn add_shipping_address(&mut self, input: ShippingAddressInput) -> AddressId {
        let id = AddressId::random();
        if input.is_default {
            for existing in &mut self.shipping_addresses {
                existing.is_default = false;
            }
        }
        self.shipping_addresses.push(ShippingAddress {
            id,
            name: input.name,
            street: input.street,
            city: input.city,
            state: input.state,
            zip: input.zip,
            country: input.country,
            phone: input.phone,
            is_default: input.is_default,
        });
        id
    }

    /// Append a new payment method with a fresh ID, enforcing that at most
    /// one method keeps `is_default`.
    pub fn add_payment_method(&mut self, input: PaymentMethodInput) -> PaymentMethodId {
        let id = PaymentMethodId::random();
        if input.is_default {
            for existing in &mut self.payment_methods {
                existing.is_default = false;
            }
        }
        self.payment_methods.push(PaymentMethod {
            id,
            card_number: input.card_number,
            card_holder: input.card_holder,
            expiry: input.expiry,
            card_type: input.card_type,
            is_default: input.is_default,
        });
        id
    }

    /// Mark one address as the default, clearing the flag on the rest.
    /// Returns false if the ID is unknown (profile unchanged).
    pub fn set_default_shipping_address(&mut self, id: AddressId) -> bool {
        if !self.shipping_addresses.iter().any(|a| a.id == id) {
            return false;
        }
        for address in &mut self.shipping_addresses {
            address.is_default = address.id == id;
        }
        true
    }

    /// Mark one payment method as the default, clearing the flag on the
    /// rest. Returns false if the ID is unknown (profile unchanged).
    pub fn set_default_payment_method(&mut self, id: PaymentMethodId) -> bool {
        if !self.payment_methods.iter().any(|m| m.id == id) {
            return false;
        }
        for method in &mut self.payment_methods {
            method.is_default = method.id == id;
        }
        true
    }

    /// The current default shipping address, if any.
    #[must_use]
    pub fn default_shipping_address(&self) -> Option<&ShippingAddress> {
        self.shipping_addresses.iter().find(|a| a.is_default)
    }

    /// The current default payment method, if any.
    #[must_use]
    pub fn default_payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| m.is_default)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address_input(name: &str, is_default: bool) -> ShippingAddressInput {
        ShippingAddressInput {
            name: name.to_string(),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
            country: "US".to_string(),
            phone: "555-0100".to_string(),
            is_default,
        }
    }

    #[test]
    fn test_apply_patch_shallow_merge() {
        let mut profile = UserProfile {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            ..UserProfile::default()
        };
        profile.apply_patch(ProfilePatch {
            email: Some("ada@new.example".to_string()),
            ..ProfilePatch::default()
        });
        assert_eq!(profile.name.as_deref(), Some("Ada"));
        assert_eq!(profile.email.as_deref(), Some("ada@new.example"));
        assert!(profile.phone.is_none());
    }

    #[test]
    fn test_default_address_exclusivity_on_add() {
        let mut profile = UserProfile::default();
        let first = profile.add_shipping_address(address_input("home", true));
        let second = profile.add_shipping_address(address_input("work", true));
        assert_ne!(first, second);

        let defaults: Vec<_> = profile
            .shipping_addresses
            .iter()
            .filter(|a| a.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults.first().unwrap().id, second);
    }

    #[test]
    fn test_non_default_add_keeps_existing_default() {
        let mut profile = UserProfile::default();
        let first = profile.add_shipping_address(address_input("home", true));
        profile.add_shipping_address(address_input("work", false));
        assert_eq!(profile.default_shipping_address().unwrap().id, first);
    }

    #[test]
    fn test_set_default_shipping_address() {
        let mut profile = UserProfile::default();
        let first = profile.add_shipping_address(address_input("home", true));
        let second = profile.add_shipping_address(address_input("work", false));

        assert!(profile.set_default_shipping_address(second));
        assert_eq!(profile.default_shipping_address().unwrap().id, second);
        assert!(
            !profile
                .shipping_addresses
                .iter()
                .find(|a| a.id == first)
                .unwrap()
                .is_default
        );

        // Unknown ID leaves the profile untouched
        assert!(!profile.set_default_shipping_address(AddressId::random()));
        assert_eq!(profile.default_shipping_address().unwrap().id, second);
    }

    #[test]
    fn test_payment_method_default_exclusivity() {
        let mut profile = UserProfile::default();
        let first = profile.add_payment_method(PaymentMethodInput {
            card_number: "4111111111111111".to_string(),
            card_holder: "Ada".to_string(),
            expiry: "12/30".to_string(),
            card_type: "visa".to_string(),
            is_default: true,
        });
        let second = profile.add_payment_method(PaymentMethodInput {
            card_number: "5500000000000004".to_string(),
            card_holder: "Ada".to_string(),
            expiry: "06/29".to_string(),
            card_type: "mastercard".to_string(),
            is_default: true,
        });
        assert_eq!(profile.default_payment_method().unwrap().id, second);
        assert!(profile.set_default_payment_method(first));
        assert_eq!(profile.default_payment_method().unwrap().id, first);
    }

    #[test]
    fn test_notification_settings_merge() {
        let mut settings = NotificationSettings::default();
        settings.merge(BTreeMap::from([
            ("order_updates".to_string(), true),
            ("promotions".to_string(), true),
        ]));
        settings.merge(BTreeMap::from([("promotions".to_string(), false)]));
        assert_eq!(settings.get("order_updates"), Some(true));
        assert_eq!(settings.get("promotions"), Some(false));
        assert_eq!(settings.get("unknown"), None);
    }

    #[test]
    fn test_profile_roundtrip_with_legacy_missing_fields() {
        // Records written before notification settings existed still load
        let json = r#"{"name":"Ada","shipping_addresses":[]}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Ada"));
        assert!(profile.notification_settings.0.is_empty());
    }
}
