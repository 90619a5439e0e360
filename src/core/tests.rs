#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use async_trait::async_trait;

    use crate::core::auth::codes;
    use crate::core::user::{Partner, PartnerAccess, UserRecord};
    use crate::core::{
        ACCESS_TOKEN_KEY, AuthProvider, AuthUser, Catalogue, Credentials, ErrorCodeMatching,
        EventFields, EventLogger, EventName, FormError, FormErrorSink, KeyValueStore, Locale,
        LoginCollaborators, LoginFlowError, LoginSettings, LoginSubmissionFlow, MemoryStore,
        MessageKey, Navigator, ProviderError, QueryError, StorageError, SubmitOutcome, Translator,
        UserCredential, UserProfile, UserQuery, UserQueryResponse,
    };

    type Journal = Rc<RefCell<Vec<String>>>;

    // ========================================================================
    // Test doubles
    // ========================================================================

    #[derive(Clone)]
    enum TokenScript {
        Token(&'static str),
        NoToken,
        NoUser,
        Fails(ProviderError),
    }

    #[derive(Clone)]
    enum SignInScript {
        Accept(TokenScript),
        Reject(ProviderError),
    }

    struct FakeUser {
        journal: Journal,
        token: TokenScript,
    }

    #[async_trait(?Send)]
    impl AuthUser for FakeUser {
        async fn get_id_token(&self) -> Result<Option<String>, ProviderError> {
            self.journal.borrow_mut().push("get_id_token".into());
            match &self.token {
                TokenScript::Token(token) => Ok(Some(token.to_string())),
                TokenScript::NoToken | TokenScript::NoUser => Ok(None),
                TokenScript::Fails(err) => Err(err.clone()),
            }
        }
    }

    struct FakeProvider {
        journal: Journal,
        script: SignInScript,
        calls: RefCell<Vec<(String, String)>>,
    }

    #[async_trait(?Send)]
    impl AuthProvider for FakeProvider {
        async fn sign_in_with_email_and_password(
            &self,
            email: &str,
            password: &str,
        ) -> Result<UserCredential, ProviderError> {
            self.journal.borrow_mut().push("sign_in".into());
            self.calls
                .borrow_mut()
                .push((email.to_string(), password.to_string()));

            match &self.script {
                SignInScript::Reject(err) => Err(err.clone()),
                SignInScript::Accept(TokenScript::NoUser) => Ok(UserCredential::empty()),
                SignInScript::Accept(token) => Ok(UserCredential::new(FakeUser {
                    journal: self.journal.clone(),
                    token: token.clone(),
                })),
            }
        }
    }

    struct FakeUserQuery {
        journal: Journal,
        response: UserQueryResponse,
        identifiers: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl UserQuery for FakeUserQuery {
        async fn get_user(&self, identifier: &str) -> UserQueryResponse {
            self.journal.borrow_mut().push("get_user".into());
            self.identifiers.borrow_mut().push(identifier.to_string());
            self.response.clone()
        }
    }

    struct RecordingEvents {
        journal: Journal,
        events: RefCell<Vec<(EventName, EventFields)>>,
    }

    impl EventLogger for RecordingEvents {
        fn log_event(&self, event: EventName, fields: EventFields) {
            self.journal.borrow_mut().push(format!("event:{}", event));
            self.events.borrow_mut().push((event, fields));
        }
    }

    struct RecordingNavigator {
        journal: Journal,
        paths: RefCell<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn push(&self, path: &str) {
            self.journal.borrow_mut().push(format!("push:{}", path));
            self.paths.borrow_mut().push(path.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingFormError {
        history: RefCell<Vec<Option<FormError>>>,
    }

    impl RecordingFormError {
        fn current(&self) -> Option<FormError> {
            self.history.borrow().last().cloned().flatten()
        }
    }

    impl FormErrorSink for RecordingFormError {
        fn set_form_error(&self, error: Option<FormError>) {
            self.history.borrow_mut().push(error);
        }
    }

    struct JournalStore {
        journal: Journal,
        inner: MemoryStore,
        fail_writes: bool,
    }

    impl KeyValueStore for JournalStore {
        fn get_item(&self, key: &str) -> Option<String> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.journal.borrow_mut().push(format!("store:{}", key));
            if self.fail_writes {
                return Err(StorageError::WriteFailed(key.to_string()));
            }
            self.inner.set_item(key, value)
        }
    }

    struct Harness {
        journal: Journal,
        provider: Rc<FakeProvider>,
        users: Rc<FakeUserQuery>,
        events: Rc<RecordingEvents>,
        navigator: Rc<RecordingNavigator>,
        storage: Rc<JournalStore>,
        form_error: Rc<RecordingFormError>,
        flow: LoginSubmissionFlow,
    }

    impl Harness {
        fn new(script: SignInScript, response: UserQueryResponse) -> Self {
            Self::build(script, response, LoginSettings::default(), false)
        }

        fn build(
            script: SignInScript,
            response: UserQueryResponse,
            settings: LoginSettings,
            fail_writes: bool,
        ) -> Self {
            let journal: Journal = Rc::default();
            let provider = Rc::new(FakeProvider {
                journal: journal.clone(),
                script,
                calls: RefCell::default(),
            });
            let users = Rc::new(FakeUserQuery {
                journal: journal.clone(),
                response,
                identifiers: RefCell::default(),
            });
            let events = Rc::new(RecordingEvents {
                journal: journal.clone(),
                events: RefCell::default(),
            });
            let navigator = Rc::new(RecordingNavigator {
                journal: journal.clone(),
                paths: RefCell::default(),
            });
            let storage = Rc::new(JournalStore {
                journal: journal.clone(),
                inner: MemoryStore::new(),
                fail_writes,
            });
            let form_error = Rc::new(RecordingFormError::default());

            let flow = LoginSubmissionFlow::new(
                LoginCollaborators {
                    auth: provider.clone(),
                    users: users.clone(),
                    events: events.clone(),
                    translator: Rc::new(Catalogue::default()),
                    navigator: navigator.clone(),
                    storage: storage.clone(),
                    form_error: form_error.clone(),
                },
                settings,
            );

            Self {
                journal,
                provider,
                users,
                events,
                navigator,
                storage,
                form_error,
                flow,
            }
        }

        async fn submit(&self) -> Result<SubmitOutcome, LoginFlowError> {
            self.flow
                .submit(Credentials::new("user@example.com", "correct horse"))
                .await
        }

        fn event_names(&self) -> Vec<EventName> {
            self.events.events.borrow().iter().map(|(name, _)| *name).collect()
        }

        fn fields_of(&self, name: EventName) -> EventFields {
            self.events
                .events
                .borrow()
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, fields)| fields.clone())
                .unwrap_or_default()
        }

        fn journal(&self) -> Vec<String> {
            self.journal.borrow().clone()
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            user: UserRecord {
                id: "user-1".into(),
                name: Some("Sam".into()),
                email: Some("user@example.com".into()),
                created_at: Some("2023-02-01T10:00:00Z".into()),
                language: Some("en".into()),
                contact_permission: Some(true),
            },
            partner_accesses: vec![PartnerAccess {
                partner: Partner {
                    name: "Bumble".into(),
                },
                feature_therapy: true,
                feature_live_chat: true,
                therapy_sessions_remaining: 6,
                therapy_sessions_redeemed: 0,
            }],
            partner_admin: None,
        }
    }

    fn ok_user() -> UserQueryResponse {
        UserQueryResponse::Data(profile())
    }

    fn failed_user() -> UserQueryResponse {
        UserQueryResponse::Error(QueryError::new(Some(401), "Unauthorized"))
    }

    fn reject(code: &str) -> SignInScript {
        SignInScript::Reject(ProviderError::new(code, format!("rejected: {}", code)))
    }

    fn text(key: MessageKey) -> FormError {
        FormError::from(Catalogue::default().t(key))
    }

    // ========================================================================
    // Request event
    // ========================================================================

    #[tokio::test]
    async fn test_request_event_emitted_once_before_sign_in() {
        let h = Harness::new(SignInScript::Accept(TokenScript::Token("tok")), ok_user());
        h.submit().await.unwrap();

        let journal = h.journal();
        let request_at = journal
            .iter()
            .position(|e| e == "event:LOGIN_REQUEST")
            .unwrap();
        let sign_in_at = journal.iter().position(|e| e == "sign_in").unwrap();

        assert!(request_at < sign_in_at);
        assert_eq!(
            h.event_names()
                .iter()
                .filter(|n| **n == EventName::LoginRequest)
                .count(),
            1
        );
        assert_eq!(h.fields_of(EventName::LoginRequest)["partner"], "bumble");
    }

    #[tokio::test]
    async fn test_request_event_emitted_on_rejection_too() {
        let h = Harness::new(reject(codes::WRONG_PASSWORD), ok_user());
        h.submit().await.unwrap();

        assert_eq!(
            h.event_names(),
            vec![EventName::LoginRequest, EventName::LoginError]
        );
    }

    #[tokio::test]
    async fn test_credentials_passed_to_provider() {
        let h = Harness::new(reject(codes::WRONG_PASSWORD), ok_user());
        h.submit().await.unwrap();

        assert_eq!(
            h.provider.calls.borrow().as_slice(),
            &[("user@example.com".to_string(), "correct horse".to_string())]
        );
    }

    #[tokio::test]
    async fn test_form_error_cleared_first() {
        let h = Harness::new(reject(codes::INVALID_EMAIL), ok_user());
        h.submit().await.unwrap();
        h.submit().await.unwrap();

        let history = h.form_error.history.borrow();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], None);
        assert_eq!(history[1], Some(text(MessageKey::InvalidEmail)));
        assert_eq!(history[2], None);
    }

    // ========================================================================
    // Rejections
    // ========================================================================

    #[tokio::test]
    async fn test_invalid_email_shows_invalid_email_message() {
        let h = Harness::new(reject(codes::INVALID_EMAIL), ok_user());
        let outcome = h.submit().await.unwrap();

        assert_eq!(h.form_error.current(), Some(text(MessageKey::InvalidEmail)));

        let fields = h.fields_of(EventName::LoginError);
        assert_eq!(fields["partner"], "bumble");
        assert_eq!(fields["message"], codes::INVALID_EMAIL);

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                code: codes::INVALID_EMAIL.to_string(),
                message: "rejected: auth/invalid-email".to_string(),
                form_error: Some(text(MessageKey::InvalidEmail)),
            }
        );
    }

    #[tokio::test]
    async fn test_every_other_code_shows_auth_error() {
        for code in [
            codes::USER_NOT_FOUND,
            codes::WRONG_PASSWORD,
            codes::TOO_MANY_REQUESTS,
            "auth/some-unknown-code",
        ] {
            let h = Harness::new(reject(code), ok_user());
            h.submit().await.unwrap();

            assert_eq!(
                h.form_error.current(),
                Some(text(MessageKey::AuthError)),
                "code {}",
                code
            );
            assert_eq!(h.fields_of(EventName::LoginError)["message"], code);
        }
    }

    #[tokio::test]
    async fn test_strict_matching_leaves_unknown_codes_blank() {
        let settings = LoginSettings {
            error_matching: ErrorCodeMatching::Strict,
            ..LoginSettings::default()
        };
        let h = Harness::build(
            reject("auth/some-unknown-code"),
            ok_user(),
            settings,
            false,
        );
        let outcome = h.submit().await.unwrap();

        assert_eq!(h.form_error.current(), None);
        assert!(matches!(outcome, SubmitOutcome::Rejected { form_error: None, .. }));
        assert_eq!(h.event_names().last(), Some(&EventName::LoginError));
    }

    #[tokio::test]
    async fn test_rejection_has_no_other_side_effects() {
        let h = Harness::new(reject(codes::WRONG_PASSWORD), ok_user());
        h.submit().await.unwrap();

        assert!(h.storage.inner.is_empty());
        assert!(h.users.identifiers.borrow().is_empty());
        assert!(h.navigator.paths.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_message_localized() {
        let journal: Journal = Rc::default();
        let h = Harness::new(reject(codes::WRONG_PASSWORD), ok_user());
        let form_error = Rc::new(RecordingFormError::default());
        let flow = LoginSubmissionFlow::new(
            LoginCollaborators {
                auth: h.provider.clone(),
                users: h.users.clone(),
                events: Rc::new(RecordingEvents {
                    journal,
                    events: RefCell::default(),
                }),
                translator: Rc::new(Catalogue::new(Locale::Es)),
                navigator: h.navigator.clone(),
                storage: h.storage.clone(),
                form_error: form_error.clone(),
            },
            LoginSettings::default(),
        );

        flow.submit(Credentials::new("a@b.com", "pw")).await.unwrap();

        assert_eq!(
            form_error.current(),
            Some(FormError::from(
                Catalogue::new(Locale::Es).t(MessageKey::AuthError)
            ))
        );
    }

    // ========================================================================
    // Success path
    // ========================================================================

    #[tokio::test]
    async fn test_success_stores_token_logs_and_redirects() {
        let h = Harness::new(SignInScript::Accept(TokenScript::Token("id-token-1")), ok_user());
        let outcome = h.submit().await.unwrap();

        assert_eq!(
            h.storage.get_item(ACCESS_TOKEN_KEY),
            Some("id-token-1".to_string())
        );
        assert_eq!(h.navigator.paths.borrow().as_slice(), &["/therapy-booking".to_string()]);
        assert_eq!(
            outcome,
            SubmitOutcome::Redirected {
                path: "/therapy-booking".to_string()
            }
        );

        let fields = h.fields_of(EventName::LoginSuccess);
        assert_eq!(fields["account_type"], "partner_user");
        assert_eq!(fields["partner"], "Bumble");
        assert_eq!(fields["therapy_sessions_remaining"], 6);
        assert_eq!(fields["registration_date"], "2023-02-01T10:00:00Z");

        assert_eq!(h.form_error.current(), None);
    }

    #[tokio::test]
    async fn test_success_step_order() {
        let h = Harness::new(SignInScript::Accept(TokenScript::Token("tok")), ok_user());
        h.submit().await.unwrap();

        assert_eq!(
            h.journal(),
            vec![
                "event:LOGIN_REQUEST",
                "sign_in",
                "get_id_token",
                "store:accessToken",
                "get_user",
                "event:LOGIN_SUCCESS",
                "push:/therapy-booking",
            ]
        );
    }

    #[tokio::test]
    async fn test_user_query_called_with_empty_identifier() {
        let h = Harness::new(SignInScript::Accept(TokenScript::Token("tok")), ok_user());
        h.submit().await.unwrap();

        assert_eq!(h.users.identifiers.borrow().as_slice(), &[String::new()]);
    }

    #[tokio::test]
    async fn test_token_overwritten_on_each_login() {
        let h = Harness::new(SignInScript::Accept(TokenScript::Token("fresh")), ok_user());
        h.storage.inner.set_item(ACCESS_TOKEN_KEY, "stale").unwrap();

        h.submit().await.unwrap();

        assert_eq!(h.storage.get_item(ACCESS_TOKEN_KEY), Some("fresh".to_string()));
    }

    #[tokio::test]
    async fn test_custom_redirect_path() {
        let settings = LoginSettings {
            redirect_path: "/courses".to_string(),
            partner: "badoo".to_string(),
            ..LoginSettings::default()
        };
        let h = Harness::build(
            SignInScript::Accept(TokenScript::Token("tok")),
            ok_user(),
            settings,
            false,
        );
        h.submit().await.unwrap();

        assert_eq!(h.flow.settings().redirect_path, "/courses");
        assert_eq!(h.navigator.paths.borrow().as_slice(), &["/courses".to_string()]);
        assert_eq!(h.fields_of(EventName::LoginRequest)["partner"], "badoo");
    }

    // ========================================================================
    // Silent gaps
    // ========================================================================

    #[tokio::test]
    async fn test_user_query_error_is_silent() {
        let h = Harness::new(SignInScript::Accept(TokenScript::Token("tok")), failed_user());
        let outcome = h.submit().await.unwrap();

        assert_eq!(outcome, SubmitOutcome::UserQueryFailed);
        assert!(h.navigator.paths.borrow().is_empty());
        assert_eq!(h.form_error.current(), None);
        assert_eq!(h.event_names(), vec![EventName::LoginRequest]);
        // Token is still persisted before the query runs
        assert_eq!(h.storage.get_item(ACCESS_TOKEN_KEY), Some("tok".to_string()));
    }

    #[tokio::test]
    async fn test_missing_token_skips_storage_but_queries_user() {
        let h = Harness::new(SignInScript::Accept(TokenScript::NoToken), ok_user());
        let outcome = h.submit().await.unwrap();

        assert!(h.storage.inner.is_empty());
        assert!(!h.journal().iter().any(|e| e.starts_with("store:")));
        assert_eq!(h.users.identifiers.borrow().len(), 1);
        assert!(matches!(outcome, SubmitOutcome::Redirected { .. }));
    }

    #[tokio::test]
    async fn test_credential_without_user_behaves_like_missing_token() {
        let h = Harness::new(SignInScript::Accept(TokenScript::NoUser), ok_user());
        h.submit().await.unwrap();

        assert!(h.storage.inner.is_empty());
        assert!(!h.journal().contains(&"get_id_token".to_string()));
        assert_eq!(h.users.identifiers.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_token_failure_escapes_flow() {
        let h = Harness::new(
            SignInScript::Accept(TokenScript::Fails(ProviderError::new(
                codes::NETWORK_REQUEST_FAILED,
                "offline",
            ))),
            ok_user(),
        );
        let result = h.submit().await;

        match result {
            Err(LoginFlowError::IdToken(err)) => {
                assert_eq!(err.code, codes::NETWORK_REQUEST_FAILED)
            }
            other => panic!("expected token failure, got {:?}", other),
        }

        assert_eq!(h.form_error.current(), None);
        assert!(h.users.identifiers.borrow().is_empty());
        assert!(h.navigator.paths.borrow().is_empty());
        assert_eq!(h.event_names(), vec![EventName::LoginRequest]);
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_stop_login() {
        let h = Harness::build(
            SignInScript::Accept(TokenScript::Token("tok")),
            ok_user(),
            LoginSettings::default(),
            true,
        );
        let outcome = h.submit().await.unwrap();

        assert!(h.storage.inner.is_empty());
        assert!(matches!(outcome, SubmitOutcome::Redirected { .. }));
    }

    #[tokio::test]
    async fn test_flow_clones_share_no_state() {
        let h = Harness::new(SignInScript::Accept(TokenScript::Token("tok")), ok_user());
        let second = h.flow.clone();

        h.submit().await.unwrap();
        second
            .submit(Credentials::new("other@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(h.navigator.paths.borrow().len(), 2);
        assert_eq!(
            h.event_names()
                .iter()
                .filter(|n| **n == EventName::LoginSuccess)
                .count(),
            2
        );
    }
}
