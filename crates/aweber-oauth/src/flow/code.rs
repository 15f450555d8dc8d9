//! Authorization Code Flow implementation.

use super::OAuthClient;
use crate::error::{Error, Result};
use crate::token::Token;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use url::Url;

/// Authorization Code Flow for `OAuth2`.
///
/// The operator opens the authorization URL, logs in, and hands back the
/// URL the browser was redirected to. The code in that URL is exchanged for
/// a token with the client secret.
#[derive(Debug)]
pub struct AuthorizationCodeFlow {
    client: OAuthClient,
    state: String,
}

impl AuthorizationCodeFlow {
    /// Creates a new authorization code flow with a fresh random `state`.
    #[must_use]
    pub fn new(client: OAuthClient) -> Self {
        Self {
            client,
            state: generate_state(),
        }
    }

    /// Replaces the generated `state` value.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// The `state` value sent with the authorization request.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Builds the authorization URL for user consent, requesting the
    /// provider's default scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider endpoints are unusable.
    pub fn authorization_url(&self) -> Result<Url> {
        self.client.provider.validate()?;
        let mut url = self.client.provider.auth_url.clone();

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client.client_id);

            if let Some(redirect_uri) = &self.client.redirect_uri {
                pairs.append_pair("redirect_uri", redirect_uri);
            }

            let scope_str = self.client.provider.default_scopes.join(" ");

            if !scope_str.is_empty() {
                pairs.append_pair("scope", &scope_str);
            }

            pairs.append_pair("state", &self.state);
        }

        Ok(url)
    }

    /// Extracts the authorization code from the URL the browser landed on.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed, carries an `error`
    /// parameter, has a mismatched `state`, or has no `code`.
    pub fn code_from_redirect(&self, redirect: &str) -> Result<String> {
        let url = Url::parse(redirect.trim())?;

        let mut code = None;
        let mut state = None;
        let mut error = None;
        let mut description = String::new();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "state" => state = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_description" => description = value.into_owned(),
                _ => {}
            }
        }

        if let Some(error) = error {
            return Err(if error == "access_denied" {
                Error::AccessDenied
            } else {
                Error::oauth_error(error, description)
            });
        }

        if state.as_deref() != Some(self.state.as_str()) {
            return Err(Error::StateMismatch);
        }

        code.filter(|c| !c.is_empty())
            .ok_or_else(|| Error::InvalidResponse("redirect URL has no authorization code".into()))
    }

    /// Exchanges the authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        self.client.exchange_code(code).await
    }

    /// Parses the pasted redirect URL and exchanges its code.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect is unusable or the exchange fails.
    pub async fn exchange_redirect(&self, redirect: &str) -> Result<Token> {
        let code = self.code_from_redirect(redirect)?;
        self.exchange_code(&code).await
    }
}

/// Random URL-safe CSRF token.
fn generate_state() -> String {
    let random_bytes: [u8; 24] = rand::thread_rng().r#gen();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::provider::Provider;

    fn flow() -> AuthorizationCodeFlow {
        let provider = Provider::aweber().unwrap();
        let client = OAuthClient::new("test_client", provider)
            .with_client_secret("secret")
            .with_redirect_uri("http://localhost");
        AuthorizationCodeFlow::new(client).with_state("fixed_state")
    }

    #[test]
    fn test_authorization_url() {
        let url = flow().authorization_url().unwrap();

        assert!(url.as_str().starts_with("https://auth.aweber.com/oauth2/authorize?"));
        assert!(url.as_str().contains("client_id=test_client"));
        assert!(url.as_str().contains("response_type=code"));
        assert!(url.as_str().contains("state=fixed_state"));
        assert!(url.as_str().contains("redirect_uri=http%3A%2F%2Flocalhost"));
        // Space becomes + in query parameters
        assert!(
            url.as_str()
                .contains("scope=account.read+list.read+email.read")
        );
    }

    #[test]
    fn test_authorization_url_without_scopes() {
        let provider =
            Provider::new("https://auth.test/authorize", "https://auth.test/token").unwrap();
        let flow = AuthorizationCodeFlow::new(OAuthClient::new("c", provider)).with_state("s");
        let url = flow.authorization_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://auth.test/authorize?response_type=code&client_id=c&state=s"
        );
    }

    #[test]
    fn test_generated_states_differ() {
        let provider = Provider::aweber().unwrap();
        let a = AuthorizationCodeFlow::new(OAuthClient::new("c", provider.clone()));
        let b = AuthorizationCodeFlow::new(OAuthClient::new("c", provider));
        assert_ne!(a.state(), b.state());
        assert_eq!(a.state().len(), 32);
    }

    #[test]
    fn test_code_from_redirect() {
        let code = flow()
            .code_from_redirect("  http://localhost/?code=the_code&state=fixed_state \n")
            .unwrap();
        assert_eq!(code, "the_code");
    }

    #[test]
    fn test_state_mismatch() {
        let err = flow()
            .code_from_redirect("http://localhost/?code=the_code&state=other")
            .unwrap_err();
        assert!(matches!(err, Error::StateMismatch));

        let err = flow()
            .code_from_redirect("http://localhost/?code=the_code")
            .unwrap_err();
        assert!(matches!(err, Error::StateMismatch));
    }

    #[test]
    fn test_denied_redirect() {
        let err = flow()
            .code_from_redirect("http://localhost/?error=access_denied&state=fixed_state")
            .unwrap_err();
        assert!(matches!(err, Error::AccessDenied));
    }

    #[test]
    fn test_other_error_redirect() {
        let err = flow()
            .code_from_redirect(
                "http://localhost/?error=invalid_scope&error_description=bad+scope&state=fixed_state",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::OAuth { error, description }
                if error == "invalid_scope" && description == "bad scope"
        ));
    }

    #[test]
    fn test_missing_code() {
        let err = flow()
            .code_from_redirect("http://localhost/?state=fixed_state")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_not_a_url() {
        assert!(matches!(
            flow().code_from_redirect("the_code"),
            Err(Error::UrlError(_))
        ));
    }
}
