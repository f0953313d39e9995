//! Authentication and password endpoints.
//!
//! These calls are never cached: credentials and account lookups always go
//! to the service. Sign-in responses are stored into the session so every
//! later call picks up the bearer token, and sign-out clears local state
//! even when the service cannot be reached.

use tracing::debug;
use warden_core::{
    AuthTokens, ForgotPasswordRequest, LoginRequest, RefreshedTokens, RegisterRequest,
    ResetLinkCheck, ResetPasswordRequest, Result, User, decode_data, decode_document, decode_unit,
};

use crate::WardenClient;
use crate::pipeline::ApiRequest;
use crate::resources::encode;

/// `/auth` endpoints.
pub struct AuthApi<'a> {
    client: &'a WardenClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a WardenClient) -> Self {
        Self { client }
    }

    /// Creates an account and signs in with the returned credentials.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthTokens> {
        let request = ApiRequest::post("/auth/register").with_json(encode(&request)?);
        self.sign_in(request).await
    }

    /// Signs in with email and password.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthTokens> {
        let request = ApiRequest::post("/auth/login").with_json(encode(&request)?);
        self.sign_in(request).await
    }

    async fn sign_in(&self, request: ApiRequest) -> Result<AuthTokens> {
        let response = self.client.pipeline.execute(&request).await?;
        let tokens: AuthTokens = decode_data(response.status, &response.body)?;

        debug!(username = %tokens.user.username, "signed in");
        self.client
            .session
            .set_credentials(
                Some(tokens.user.clone()),
                tokens.access_token.clone(),
                tokens.refresh_token.clone(),
            )
            .await?;

        Ok(tokens)
    }

    /// Exchanges the stored refresh token for fresh credentials.
    ///
    /// The rotated tokens are stored; the signed-in user is untouched.
    pub async fn refresh(&self) -> Result<RefreshedTokens> {
        self.client.pipeline.refresh_session().await
    }

    /// Signs out.
    ///
    /// The service is told first so it can revoke the tokens, but the local
    /// session and cache are cleared regardless of the outcome. A failed
    /// server call is still returned as the error.
    pub async fn logout(&self) -> Result<()> {
        let server_result = match self.client.pipeline.execute(&ApiRequest::post("/auth/logout")).await {
            Ok(response) => decode_unit(response.status, &response.body),
            Err(err) => Err(err),
        };

        if let Err(err) = &server_result {
            debug!(error = %err, "server-side logout failed, clearing local session anyway");
        }
        self.client.session.log_out().await?;
        self.client.cache.clear();

        server_result
    }

    /// Fetches the signed-in account and stores it into the session.
    pub async fn me(&self) -> Result<User> {
        let response = self
            .client
            .pipeline
            .execute(&ApiRequest::get("/auth/me"))
            .await?;
        let user: User = decode_data(response.status, &response.body)?;

        self.client.session.update_user(user.clone()).await?;
        Ok(user)
    }

    /// Requests a password reset email for `email`.
    pub async fn forgot_password(&self, email: impl Into<String>) -> Result<()> {
        let payload = ForgotPasswordRequest {
            email: email.into(),
        };
        let request = ApiRequest::post("/auth/forgot-password").with_json(encode(&payload)?);
        let response = self.client.pipeline.execute(&request).await?;
        decode_unit(response.status, &response.body)
    }

    /// Sets a new password using a reset token from the emailed link.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<()> {
        let request = ApiRequest::post("/auth/reset-password").with_json(encode(&request)?);
        let response = self.client.pipeline.execute(&request).await?;
        decode_unit(response.status, &response.body)
    }

    /// Checks whether a reset token is still valid.
    ///
    /// This endpoint answers with its fields next to `status` instead of
    /// inside `data`, so it is decoded as a whole document.
    pub async fn check_reset_link(&self, token: &str) -> Result<ResetLinkCheck> {
        let request = ApiRequest::get(format!("/auth/reset-password/{token}"));
        let response = self.client.pipeline.execute(&request).await?;
        decode_document(response.status, &response.body)
    }
}
