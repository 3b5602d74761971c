//! Integration tests for the broker crates.
//!
//! These tests run complete switch-browser flows across the flight registry,
//! the response parser and both operations, plus the session key exchange
//! across the KDF and the cipher.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use broker_flight::{FlightDataProvider, QueryKeyFlightDelegate, QueryKeyType, StaticFlightProvider};
use broker_webview::{BoxError, CertificateAuthChannel, PresentationContext, RequestContext};
use parking_lot::Mutex;
use tokio::sync::{oneshot, Notify};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Tracing
// ============================================================================

static TRACING: Once = Once::new();

/// Installs a test subscriber once. Set `RUST_LOG` to see output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Test Channel
// ============================================================================

/// Certificate auth channel that waits for the app to hand it the callback
/// URL, the way a real browser session ends.
#[derive(Default)]
pub struct CallbackChannel {
    pending: Mutex<Option<oneshot::Sender<String>>>,
    redirect_prefix: Mutex<Option<String>>,
    opened: Mutex<Vec<String>>,
    opened_notify: Notify,
    resets: AtomicUsize,
}

impl CallbackChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Resolves once `start` has opened a URL.
    pub async fn wait_until_opened(&self) {
        self.opened_notify.notified().await;
    }

    /// Drops the pending session so `start` fails.
    pub fn cancel(&self) -> bool {
        self.pending.lock().take().is_some()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().clone()
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CertificateAuthChannel for CallbackChannel {
    async fn start(
        &self,
        start_url: &str,
        _presentation: &PresentationContext,
        _context: &RequestContext,
    ) -> Result<String, BoxError> {
        let (tx, rx) = oneshot::channel();
        *self.pending.lock() = Some(tx);
        self.opened.lock().push(start_url.to_string());
        self.opened_notify.notify_one();

        rx.await
            .map_err(|_| BoxError::from("browser session cancelled"))
    }

    fn complete_with_callback_url(&self, url: &str) -> bool {
        if let Some(prefix) = self.redirect_prefix.lock().as_deref() {
            if !url
                .to_ascii_lowercase()
                .starts_with(&prefix.to_ascii_lowercase())
            {
                return false;
            }
        }

        match self.pending.lock().take() {
            Some(tx) => tx.send(url.to_string()).is_ok(),
            None => false,
        }
    }

    fn set_redirect_uri_prefix(&self, prefix: &str, _scheme: &str) {
        *self.redirect_prefix.lock() = Some(prefix.to_string());
    }

    fn reset_state(&self) {
        *self.pending.lock() = None;
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Flights
// ============================================================================

/// Delegate that turns on the switch-browser flights for one tenant.
pub struct TenantFlights {
    pub tenant: String,
    pub calls: AtomicUsize,
}

impl QueryKeyFlightDelegate for TenantFlights {
    fn flight_provider(
        &self,
        query_key: &str,
        key_type: QueryKeyType,
    ) -> Option<Arc<dyn FlightDataProvider>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if key_type != QueryKeyType::TenantId || query_key != self.tenant {
            return None;
        }

        let provider = StaticFlightProvider::from_json(
            r#"{
                "bools": {
                    "support_switch_browser_cba": true,
                    "support_state_switch_browser_cba": true
                }
            }"#,
        )
        .ok()?;
        Some(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::{bail, Result};
    use broker_crypto::{random::generate_nonce, AuthenticatedCipher, CryptoError, KdfInput};
    use broker_flight::FlightRegistry;
    use broker_webview::{
        verify_state, BrowserSwitchOperation, BrowserSwitchResumeOperation, CompletionHandlers,
        ContinuationConfig, ContinuationError, ContinuationResponse, ContinuationResponseFactory,
        InteractiveParameters, OperationState, ResponseArena, UrlResponseParser, WebResponse,
    };

    const REDIRECT: &str = "msauth.com.contoso.app://auth";

    fn registry() -> FlightRegistry {
        let registry = FlightRegistry::new();
        registry.set_query_key_delegate(Some(Arc::new(TenantFlights {
            tenant: "contoso".to_string(),
            calls: AtomicUsize::new(0),
        })));
        registry
    }

    /// Parser and factory for requests made on behalf of one tenant.
    struct Tenant {
        parser: UrlResponseParser,
        factory: ContinuationResponseFactory,
    }

    impl Tenant {
        fn parse(&self, url: &str) -> Result<WebResponse, ContinuationError> {
            self.parser
                .parse(url, &self.factory, &RequestContext::new("corr-int"))
        }
    }

    fn tenant(registry: &FlightRegistry, tenant: &str) -> Result<Tenant> {
        let flights = registry.shared_instance_by_query_key(tenant, QueryKeyType::TenantId);
        let config = ContinuationConfig::new(REDIRECT).with_request_state("state");
        Ok(Tenant {
            parser: UrlResponseParser::new(config)?,
            factory: ContinuationResponseFactory::new(flights),
        })
    }

    fn params() -> InteractiveParameters {
        InteractiveParameters::new(RequestContext::new("corr-int")).with_redirect_uri(REDIRECT)
    }

    #[test]
    fn test_session_key_exchange() -> Result<()> {
        let shared_secret = [0x42u8; 32];
        let input = KdfInput {
            shared_secret: &shared_secret,
            output_key_len: 32,
            algorithm_id: b"A256GCM",
            party_u_info: b"broker",
            party_v_info: b"contoso-app",
        };

        let app_key = broker_crypto::derive(&input)?;
        let broker_key = broker_crypto::derive(&input)?;
        assert_eq!(app_key.as_slice(), broker_key.as_slice());

        let app = AuthenticatedCipher::from_key_bytes(&app_key);
        let broker = AuthenticatedCipher::from_key_bytes(&broker_key);

        let nonce = generate_nonce();
        let sealed = app.seal(b"session transport key", &nonce, b"header")?;
        let opened = broker.open(&sealed.ciphertext, &nonce, &sealed.tag, b"header")?;
        assert_eq!(opened.as_slice(), b"session transport key");

        let tampered = broker.open(&sealed.ciphertext, &nonce, &sealed.tag, b"other");
        assert!(matches!(tampered, Err(CryptoError::AuthenticationFailure)));

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_full_switch_browser_flow() -> Result<()> {
        init_tracing();
        let registry = registry();
        let contoso = tenant(&registry, "contoso")?;
        let channel = CallbackChannel::new();
        let mut arena = ResponseArena::new();

        // Server interrupts the interactive flow.
        let first = contoso.parse(
            "msauth.com.contoso.app://auth/switch_browser?action_uri=https%3A%2F%2Flogin.contoso.com%2Fcba&code=token1&state=c3RhdGU&browser_modes=AQAAAA",
        )?;
        let WebResponse::BrowserSwitch(initial) = first.clone() else {
            bail!("expected switch-browser response, got {}", first.kind());
        };
        verify_state(initial.state(), "state")?;
        assert!(initial.use_ephemeral_session());

        // The browser finishes on the resume redirect.
        let completer = {
            let channel = channel.clone();
            tokio::spawn(async move {
                channel.wait_until_opened().await;
                channel.complete_with_callback_url(
                    "msauth.com.contoso.app://auth/switch_browser_resume?action_uri=https%3A%2F%2Flogin.contoso.com%2Fresume&code=token2&state=state",
                )
            })
        };

        let (tx, rx) = oneshot::channel();
        let handlers = CompletionHandlers::new(
            move |result| {
                let _ = tx.send(result);
            },
            |_| panic!("switch-browser operation must not complete with an auth code"),
        );

        let operation = BrowserSwitchOperation::new(first, channel.clone())?;
        let state = operation
            .invoke(&params(), &contoso.parser, &contoso.factory, None, handlers)
            .await;
        assert_eq!(state, OperationState::CompletedWithResponse);
        assert!(completer.await?);

        let WebResponse::BrowserSwitchResume(mut resume) = rx.await?? else {
            bail!("expected switch-browser-resume response");
        };
        verify_state(resume.state(), "state")?;
        arena.link_parent(&mut resume, initial);

        // The resumed session ends with an authorization code.
        let completer = {
            let channel = channel.clone();
            tokio::spawn(async move {
                channel.wait_until_opened().await;
                channel.complete_with_callback_url("msauth.com.contoso.app://auth?code=final_code&state=state")
            })
        };

        let (tx, rx) = oneshot::channel();
        let handlers = CompletionHandlers::new(
            |result| panic!("resume operation sent {:?} to the response handler", result),
            move |result| {
                let _ = tx.send(result);
            },
        );

        let operation = BrowserSwitchResumeOperation::new(resume.into(), &arena, channel.clone())?;
        let state = operation
            .invoke(&params(), &contoso.parser, &contoso.factory, None, handlers)
            .await;
        assert_eq!(state, OperationState::CompletedWithAuthCode);
        assert!(completer.await?);

        let result = rx.await?;
        assert_eq!(result.code_response.code(), "final_code");
        assert_eq!(result.initiating_action_uri, "https://login.contoso.com/cba");

        assert_eq!(
            channel.opened_urls(),
            vec![
                "https://login.contoso.com/cba?code=token1".to_string(),
                "https://login.contoso.com/resume?code=token2".to_string(),
            ]
        );
        assert_eq!(channel.resets(), 2);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancelled_browser_session() -> Result<()> {
        init_tracing();
        let registry = registry();
        let contoso = tenant(&registry, "contoso")?;
        let channel = CallbackChannel::new();

        let first = contoso.parse(
            "msauth.com.contoso.app://auth/switch_browser?action_uri=https%3A%2F%2Flogin.contoso.com%2Fcba&code=token1&state=state",
        )?;

        let canceller = {
            let channel = channel.clone();
            tokio::spawn(async move {
                channel.wait_until_opened().await;
                channel.cancel()
            })
        };

        let (tx, rx) = oneshot::channel();
        let handlers = CompletionHandlers::new(
            move |result| {
                let _ = tx.send(result);
            },
            |_| panic!("cancelled session must not complete with an auth code"),
        );

        let operation = BrowserSwitchOperation::new(first, channel.clone())?;
        let state = operation
            .invoke(&params(), &contoso.parser, &contoso.factory, None, handlers)
            .await;

        assert!(canceller.await?);
        assert_eq!(state, OperationState::Failed);
        assert!(matches!(rx.await?, Err(ContinuationError::Channel(_))));
        assert_eq!(channel.resets(), 1);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_callback_for_other_redirect_ignored() -> Result<()> {
        let registry = registry();
        let contoso = tenant(&registry, "contoso")?;
        let channel = CallbackChannel::new();

        let first = contoso.parse(
            "msauth.com.contoso.app://auth/switch_browser?action_uri=https%3A%2F%2Flogin.contoso.com%2Fcba&code=token1&state=state",
        )?;

        let completer = {
            let channel = channel.clone();
            tokio::spawn(async move {
                channel.wait_until_opened().await;
                let foreign = channel.complete_with_callback_url("otherapp://auth?code=stolen");
                let ours = channel.complete_with_callback_url(
                    "MSAUTH.COM.CONTOSO.APP://auth?error=access_denied&error_description=denied",
                );
                (foreign, ours)
            })
        };

        let (tx, rx) = oneshot::channel();
        let handlers = CompletionHandlers::new(
            move |result| {
                let _ = tx.send(result);
            },
            |_| panic!("switch-browser operation must not complete with an auth code"),
        );

        let operation = BrowserSwitchOperation::new(first, channel.clone())?;
        let state = operation
            .invoke(&params(), &contoso.parser, &contoso.factory, None, handlers)
            .await;

        assert_eq!(completer.await?, (false, true));
        assert_eq!(state, OperationState::CompletedWithResponse);
        match rx.await?? {
            WebResponse::OAuthError(error) => assert_eq!(error.error(), "access_denied"),
            other => bail!("unexpected response {:?}", other),
        }

        Ok(())
    }

    #[test]
    fn test_flights_gate_continuation_parsing() -> Result<()> {
        let registry = registry();
        let url = "msauth.com.contoso.app://auth/switch_browser?action_uri=https%3A%2F%2Flogin.contoso.com%2Fcba&code=token1";

        // No provider for this tenant: continuation matchers are off.
        let gated = tenant(&registry, "fabrikam")?;
        assert_eq!(gated.parse(url)?.kind(), "authorization_code");

        // Flights on: the state flight requires a state the URL lacks.
        let enabled = tenant(&registry, "contoso")?;
        assert!(matches!(
            enabled.parse(url),
            Err(ContinuationError::MissingState)
        ));

        // Same key with another type hits the cached manager.
        let by_bundle = registry.shared_instance_by_query_key("contoso", QueryKeyType::AppBundleId);
        let by_tenant = registry.shared_instance_by_query_key("contoso", QueryKeyType::TenantId);
        assert!(Arc::ptr_eq(&by_bundle, &by_tenant));
        assert_eq!(registry.cached_instances(), 2);

        Ok(())
    }
}
