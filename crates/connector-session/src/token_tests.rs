use super::*;

#[test]
fn test_issued_token_is_current() {
    let issuer = TokenIssuer::new();
    let token = issuer.issue();
    assert!(token.is_current());
    assert_eq!(token.id(), 1);
}

#[test]
fn test_new_issue_supersedes_old_token() {
    let issuer = TokenIssuer::new();
    let first = issuer.issue();
    let second = issuer.issue();
    assert!(!first.is_current());
    assert!(second.is_current());
}

#[test]
fn test_invalidate_without_replacement() {
    let issuer = TokenIssuer::new();
    let token = issuer.issue();
    issuer.invalidate();
    assert!(!token.is_current());
    assert_eq!(issuer.current(), 2);
}

#[test]
fn test_clone_shares_generation() {
    let issuer = TokenIssuer::new();
    let token = issuer.issue();
    let clone = issuer.clone();
    clone.issue();
    assert!(!token.is_current());
}

#[test]
fn test_generations_are_monotonic() {
    let issuer = TokenIssuer::new();
    let ids: Vec<u64> = (0..5).map(|_| issuer.issue().id()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}
