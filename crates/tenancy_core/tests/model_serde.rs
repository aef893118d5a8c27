use serde_json::json;
use tenancy_core::{Account, AccountWithRole, Member};

#[test]
fn account_omits_absent_update_time() {
    let account = Account {
        created_at: 100,
        ..Account::with_id("acc-1", "Acme")
    };
    let value = serde_json::to_value(&account).unwrap();
    assert_eq!(
        value,
        json!({"id": "acc-1", "name": "Acme", "disabled": false, "created_at": 100})
    );

    let parsed: Account = serde_json::from_value(value).unwrap();
    assert_eq!(parsed.updated_at, None);
}

#[test]
fn account_with_role_flattens_account_fields() {
    let item = AccountWithRole {
        account: Account {
            created_at: 1,
            updated_at: Some(2),
            ..Account::with_id("acc-1", "Acme")
        },
        role: "owner".to_string(),
    };
    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["id"], "acc-1");
    assert_eq!(value["updated_at"], 2);
    assert_eq!(value["role"], "owner");
}

#[test]
fn member_uses_snake_case_keys() {
    let member = Member {
        id: "m1".to_string(),
        account_id: "acc-1".to_string(),
        user_id: "u1".to_string(),
        role: "guest".to_string(),
        created_at: 5,
    };
    let value = serde_json::to_value(&member).unwrap();
    assert_eq!(value["account_id"], "acc-1");
    assert_eq!(value["user_id"], "u1");
}
