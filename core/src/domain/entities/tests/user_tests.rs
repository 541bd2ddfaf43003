use crate::domain::entities::User;

#[test]
fn test_new_user_has_no_privileges() {
    let user = User::new("ada@example.com", "ada");

    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.username, "ada");
    assert!(!user.is_staff);
    assert!(!user.is_superuser);
    assert!(!user.is_verified);
    assert!(user.is_active);
}

#[test]
fn test_privilege_changes() {
    let mut user = User::new("ada@example.com", "ada");
    user.set_staff(true);
    user.set_superuser(true);
    user.verify();

    assert!(user.is_staff);
    assert!(user.is_superuser);
    assert!(user.is_verified);

    user.set_staff(false);
    assert!(!user.is_staff);
}

#[test]
fn test_deactivate() {
    let mut user = User::new("ada@example.com", "ada");
    user.deactivate();
    assert!(!user.is_active);
}
