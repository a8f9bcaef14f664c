use image_vault::models::{ImageRecord, Role, User};
use std::str::FromStr;
use uuid::Uuid;

// --- Role boundary tests ---

#[test]
fn test_role_json_spelling() {
    assert_eq!(serde_json::to_string(&Role::Regular).unwrap(), r#""regular""#);
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
    assert_eq!(
        serde_json::to_string(&Role::SuperAdmin).unwrap(),
        r#""super_admin""#
    );
}

#[test]
fn test_role_json_round_trip() {
    for role in [Role::Regular, Role::Admin, Role::SuperAdmin] {
        let json = serde_json::to_string(&role).unwrap();
        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, role);
    }
}

#[test]
fn test_unknown_role_rejected_not_defaulted() {
    // CRITICAL: a value outside the closed set must fail, never silently
    // land on any role.
    assert!(serde_json::from_str::<Role>(r#""owner""#).is_err());
    assert!(serde_json::from_str::<Role>(r#""superadmin""#).is_err());
    assert!(serde_json::from_str::<Role>(r#""""#).is_err());

    assert!(Role::from_str("moderator").is_err());
    assert!(Role::from_str("ADMIN").is_err());
    assert!(Role::from_str("").is_err());
}

#[test]
fn test_role_from_str_accepts_wire_spellings() {
    assert_eq!(Role::from_str("regular").unwrap(), Role::Regular);
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert_eq!(Role::from_str("super_admin").unwrap(), Role::SuperAdmin);
}

#[test]
fn test_role_privilege_ordering() {
    assert!(Role::Regular < Role::Admin);
    assert!(Role::Admin < Role::SuperAdmin);
}

#[test]
fn test_role_capability_matrix() {
    // Listing everything: admin and above.
    assert!(!Role::Regular.can_view_all_images());
    assert!(Role::Admin.can_view_all_images());
    assert!(Role::SuperAdmin.can_view_all_images());

    // Deleting: strictly super_admin.
    assert!(!Role::Regular.can_delete_images());
    assert!(!Role::Admin.can_delete_images());
    assert!(Role::SuperAdmin.can_delete_images());
}

// --- Serialization shape tests ---

#[test]
fn test_user_json_uses_snake_case_role() {
    let user = User {
        id: Uuid::from_u128(7),
        name: "Super Admin".to_string(),
        email: "superadmin@example.com".to_string(),
        role: Role::SuperAdmin,
    };

    let json = serde_json::to_string(&user).unwrap();

    assert!(json.contains(r#""role":"super_admin""#));
    assert!(!json.contains("SuperAdmin"));
}

#[test]
fn test_image_record_round_trip() {
    let record = ImageRecord {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        location_ref: "/uploads/abc.png".to_string(),
        title: "t1".to_string(),
        description: None,
        created_at: chrono::Utc::now(),
    };

    let json = serde_json::to_string(&record).unwrap();
    let parsed: ImageRecord = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.id, record.id);
    assert_eq!(parsed.owner_id, record.owner_id);
    assert_eq!(parsed.location_ref, record.location_ref);
    assert_eq!(parsed.description, None);
}
