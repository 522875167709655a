//! Authentication endpoints

use reqwest::Method;

use super::ApiClient;
use crate::error::Result;
use crate::models::{AuthResponse, LoginRequest, SignupRequest, User};

impl ApiClient {
    /// Create an account; the server seeds default categories and settings
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse> {
        let body = SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        self.send_json(self.request(Method::POST, "/auth/signup").json(&body))
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.request(Method::POST, "/auth/login").json(&body))
            .await
    }

    /// The user the current token belongs to
    pub async fn me(&self) -> Result<User> {
        self.send_json(self.request(Method::GET, "/auth/me")).await
    }
}
