
use log::{debug, info};
use saslconnect::{AuthCredentials, Authenticator, DesiredMechanisms, SaslError};

// cargo test --test test_010_mechanism_selection -- --nocapture
#[test]
fn test_010_mechanism_selection() {
    let mut _log_handle = test_utils::init_logger();

    info!("negotiate in default priority order");
    let server = [
        "LOGIN",
        "PLAIN",
        "CRAM-MD5",
        "SCRAM-SHA-1",
        "SCRAM-SHA-256",
        "SCRAM-SHA-512",
        "XOAUTH2",
        "ANONYMOUS",
    ];
    let credentials = AuthCredentials::new()
        .with_user("alice@example.org")
        .with_pass("pencil")
        .with_oauthbearer("ya29.token");
    let mut authenticator =
        Authenticator::new("imap", "mail.example.org", &server, credentials.clone()).unwrap();
    let mut order = Vec::new();
    while let Some(selected) = authenticator.try_next_auth() {
        order.push(selected.name);
    }
    assert_eq!(
        order,
        [
            "XOAUTH2",
            "SCRAM-SHA-512",
            "SCRAM-SHA-256",
            "SCRAM-SHA-1",
            "CRAM-MD5",
            "PLAIN",
            "LOGIN"
        ]
    );

    debug!("without a bearer token, XOAUTH2 no longer qualifies");
    let mut authenticator = Authenticator::new(
        "imap",
        "mail.example.org",
        &server,
        AuthCredentials::new()
            .with_user("alice@example.org")
            .with_pass("pencil"),
    )
    .unwrap();
    assert_eq!(
        authenticator.try_next_auth().unwrap().name,
        "SCRAM-SHA-512"
    );

    debug!("the encrypted selection never proposes plaintext mechanisms");
    let mut authenticator = Authenticator::new(
        "imap",
        "mail.example.org",
        &server,
        credentials
            .clone()
            .with_desired(DesiredMechanisms::Encrypted),
    )
    .unwrap();
    let mut order = Vec::new();
    while let Some(selected) = authenticator.try_next_auth() {
        order.push(selected.name);
    }
    assert_eq!(
        order,
        ["SCRAM-SHA-512", "SCRAM-SHA-256", "SCRAM-SHA-1", "CRAM-MD5"]
    );

    debug!("an explicit list is honored verbatim, case-insensitively");
    let mut authenticator = Authenticator::new(
        "smtp",
        "mail.example.org",
        &["plain", "login", "scram-sha-256"],
        credentials
            .clone()
            .with_desired(DesiredMechanisms::List(vec![
                "Login".to_string(),
                "SCRAM-SHA-256".to_string(),
            ])),
    )
    .unwrap();
    assert_eq!(authenticator.try_next_auth().unwrap().name, "LOGIN");
    assert_eq!(
        authenticator.try_next_auth().unwrap().name,
        "SCRAM-SHA-256"
    );
    assert!(authenticator.try_next_auth().is_none());

    debug!("after the stack drains, stepping is a usage error");
    assert!(matches!(
        authenticator.auth_step(""),
        Err(SaslError::Usage(_))
    ));
}

#[test]
fn test_no_common_mechanism() {
    let credentials = AuthCredentials::new().with_user("alice").with_pass("pw");
    let mut authenticator = Authenticator::new(
        "imap",
        "mail.example.org",
        &["GSSAPI", "EXTERNAL"],
        credentials,
    )
    .unwrap();
    assert!(authenticator.try_next_auth().is_none());
}

#[test]
fn test_custom_module_registration() {
    use saslconnect::{Mechanism, SaslModule, SaslResult};

    /// Refuses everything; stands in for a site-specific mechanism.
    #[derive(Debug)]
    struct Refuser;

    impl Mechanism for Refuser {
        fn name(&self) -> &str {
            "X-REFUSE"
        }
        fn client_first(&self) -> bool {
            true
        }
        fn is_valid(&self, _credentials: &AuthCredentials) -> bool {
            true
        }
        fn step(&mut self, _server_challenge: &str) -> SaslResult<String> {
            Err(SaslError::Usage("refused"))
        }
    }

    let credentials = AuthCredentials::new()
        .with_desired(DesiredMechanisms::List(vec!["x-refuse".to_string()]));
    let mut authenticator =
        Authenticator::new("imap", "mail.example.org", &["X-REFUSE"], credentials).unwrap();

    // not registered yet: the candidate is skipped
    assert!(authenticator.try_next_auth().is_none());

    let credentials = AuthCredentials::new()
        .with_desired(DesiredMechanisms::List(vec!["x-refuse".to_string()]));
    let mut authenticator =
        Authenticator::new("imap", "mail.example.org", &["X-REFUSE"], credentials).unwrap();
    authenticator.register_module(SaslModule::new("X-REFUSE", |_, _| Ok(Box::new(Refuser))));
    let selected = authenticator.try_next_auth().unwrap();
    assert_eq!(selected.name, "X-REFUSE");
    assert!(selected.client_first);
    assert!(matches!(
        authenticator.auth_step(""),
        Err(SaslError::Usage("refused"))
    ));
}
