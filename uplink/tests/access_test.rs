use uplink_session::access::{Credential, Scope};
use uplink_session::error::Kind;

use rand::{Rng, RngCore};

fn random_key(rng: &mut impl RngCore) -> Vec<u8> {
    let mut key = vec![0u8; rng.random_range(1..=128)];
    rng.fill_bytes(&mut key);
    key
}

fn random_address(rng: &mut impl Rng) -> String {
    let host_len = rng.random_range(1..=48);
    let host: String = (0..host_len)
        .map(|_| rng.random_range(b'a'..=b'z') as char)
        .collect();
    let port: u16 = rng.random();

    if rng.random_bool(0.5) {
        format!("{}:{}", host, port)
    } else {
        format!("1{}@{}.storj.io:{}", host.to_uppercase(), host, port)
    }
}

#[test]
fn test_credential_round_trip() {
    let mut rng = rand::rng();
    for _ in 0..256 {
        let cred = Credential::from_bytes(random_key(&mut rng)).expect("non empty key");
        let parsed = Credential::parse(cred.serialize()).expect("parsing a serialized credential");

        assert_eq!(parsed, cred, "round trip");
        assert_eq!(parsed.as_bytes(), cred.as_bytes(), "same key bytes");
    }
}

#[test]
fn test_scope_round_trip() {
    let mut rng = rand::rng();
    for _ in 0..256 {
        let addr = random_address(&mut rng);
        let cred = Credential::from_bytes(random_key(&mut rng)).expect("non empty key");
        let scope = Scope::new(&addr, cred.clone()).expect("valid scope");

        let token = scope.serialize();
        let parsed = Scope::parse(&token).expect("parsing a serialized scope");

        assert_eq!(parsed, scope, "round trip");
        assert_eq!(parsed.satellite_address(), addr, "same satellite address");
        assert_eq!(parsed.credential().as_bytes(), cred.as_bytes(), "same key bytes");
        assert_eq!(parsed.serialize(), token, "same token");
    }
}

#[test]
fn test_scope_parse_invalid_token() {
    let err = Scope::parse("not-a-valid-token").expect_err("parsing an invalid token");
    assert_eq!(err.kind(), Kind::InvalidScopeFormat, "kind");
    assert!(err.is_caller_error(), "caller error");

    let err = "".parse::<Scope>().expect_err("parsing an empty token");
    assert_eq!(err.kind(), Kind::InvalidScopeFormat, "kind");
}
