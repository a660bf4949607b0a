use crate::domain::model::Navigation;
use crate::domain::ports::StorefrontApi;
use crate::utils::error::StorefrontError;
use crate::utils::validation::validate_form_fields;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// Inline text shown under a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl FormMessage {
    fn success(text: &str) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.to_string(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOutcome {
    pub message: FormMessage,
    pub navigation: Option<Navigation>,
}

impl FormOutcome {
    pub fn succeeded(&self) -> bool {
        self.message.kind == MessageKind::Success
    }

    fn failed(text: impl Into<String>) -> Self {
        Self {
            message: FormMessage::error(text),
            navigation: None,
        }
    }
}

/// State of the header login/logout link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthLink {
    Logout { username: String },
    Login,
}

impl AuthLink {
    pub fn label(&self) -> String {
        match self {
            AuthLink::Logout { username } => format!("Logout ({})", username),
            AuthLink::Login => "Login".to_string(),
        }
    }

    pub fn href(&self) -> &'static str {
        match self {
            AuthLink::Logout { .. } => "#",
            AuthLink::Login => "/login",
        }
    }
}

pub struct AuthController<A: StorefrontApi> {
    api: Arc<A>,
}

impl<A: StorefrontApi> AuthController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn login(&self, username: &str, password: &str) -> FormOutcome {
        let username = username.trim();
        if validate_form_fields(&[("username", username), ("password", password)]).is_err() {
            return FormOutcome::failed("Please fill in all fields");
        }

        match self.api.login(username, password).await {
            Ok(_) => {
                tracing::info!("Logged in as {}", username);
                FormOutcome {
                    message: FormMessage::success("Login successful! Redirecting..."),
                    navigation: Some(Navigation::Redirect("/".to_string())),
                }
            }
            Err(e) => {
                tracing::debug!("Login failed: {}", e);
                FormOutcome::failed(rejection_text(&e, "Login failed"))
            }
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> FormOutcome {
        let username = username.trim();
        let email = email.trim();
        if validate_form_fields(&[
            ("username", username),
            ("email", email),
            ("password", password),
        ])
        .is_err()
        {
            return FormOutcome::failed("Please fill in all fields");
        }

        match self.api.register(username, email, password).await {
            Ok(_) => {
                tracing::info!("Registered user {}", username);
                FormOutcome {
                    message: FormMessage::success("Registration successful! Please login."),
                    navigation: Some(Navigation::ShowLoginForm),
                }
            }
            Err(e) => {
                tracing::debug!("Registration failed: {}", e);
                FormOutcome::failed(rejection_text(&e, "Registration failed"))
            }
        }
    }

    /// A failed session check is treated as logged out.
    pub async fn check_session(&self) -> AuthLink {
        match self.api.check_session().await {
            Ok(status) if status.logged_in => AuthLink::Logout {
                username: status.username.unwrap_or_default(),
            },
            Ok(_) => AuthLink::Login,
            Err(e) => {
                tracing::error!("Session check error: {}", e);
                AuthLink::Login
            }
        }
    }

    pub async fn logout(&self) -> Option<Navigation> {
        match self.api.logout().await {
            Ok(()) => Some(Navigation::Redirect("/login".to_string())),
            Err(e) => {
                tracing::error!("Logout error: {}", e);
                None
            }
        }
    }
}

/// Server-provided text for a refused request, the fallback when the server
/// said nothing, and a generic line for transport failures.
fn rejection_text(error: &StorefrontError, fallback: &str) -> String {
    match error.server_message() {
        Some(message) if !message.is_empty() => message.to_string(),
        Some(_) => fallback.to_string(),
        None if matches!(error, StorefrontError::Http(_)) => "An error occurred".to_string(),
        None => fallback.to_string(),
    }
}
