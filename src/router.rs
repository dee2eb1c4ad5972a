//! Top-level view selection driven by auth state

use tokio::sync::watch;

use crate::auth::AuthSnapshot;

/// Which auth form is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Sign-in form
    Login,
    /// Sign-up form
    Register,
}

/// The view presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Initial auth state still resolving
    Loading,
    /// Marketing landing page
    Landing,
    /// Email/password form in the given mode
    Auth(AuthMode),
    /// The signed-in workspace
    Dashboard,
}

/// State machine choosing between landing, auth and dashboard views.
///
/// Auth state dominates the local flags: a loading gateway always shows
/// the loading view and a signed-in user always lands on the dashboard,
/// whatever the flags say. The local flags only pick between landing and
/// the auth forms while signed out.
#[derive(Debug)]
pub struct Router {
    snapshot: AuthSnapshot,
    show_auth: bool,
    mode: AuthMode,
}

impl Router {
    /// Create a router in the loading state
    pub fn new() -> Self {
        Self {
            snapshot: AuthSnapshot::default(),
            show_auth: false,
            mode: AuthMode::Login,
        }
    }

    /// The view for the current state
    pub fn view(&self) -> View {
        if self.snapshot.loading {
            return View::Loading;
        }
        if self.snapshot.is_authenticated() {
            return View::Dashboard;
        }
        if self.show_auth {
            View::Auth(self.mode)
        } else {
            View::Landing
        }
    }

    /// "Get started" from the landing page. A signed-in user is already on
    /// the dashboard, so for them this changes nothing.
    pub fn get_started(&mut self) {
        self.show_auth = true;
    }

    /// Back from the auth forms to the landing page
    pub fn back_to_landing(&mut self) {
        self.show_auth = false;
    }

    /// Switch the auth form to sign-up
    pub fn switch_to_register(&mut self) {
        self.mode = AuthMode::Register;
    }

    /// Switch the auth form to sign-in
    pub fn switch_to_login(&mut self) {
        self.mode = AuthMode::Login;
    }

    /// Ingest an auth-state change.
    ///
    /// Signing out resets the local flags so the next view is the landing
    /// page rather than a stale auth form.
    pub fn apply(&mut self, snapshot: AuthSnapshot) {
        let signed_out = self.snapshot.is_authenticated() && !snapshot.is_authenticated();
        self.snapshot = snapshot;
        if signed_out {
            self.show_auth = false;
            self.mode = AuthMode::Login;
        }
    }

    /// Apply snapshots from a gateway subscription until the sender closes
    pub async fn drive(&mut self, mut rx: watch::Receiver<AuthSnapshot>) {
        let initial = rx.borrow_and_update().clone();
        self.apply(initial);

        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            self.apply(snapshot);
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::User;

    fn signed_out() -> AuthSnapshot {
        AuthSnapshot {
            loading: false,
            user: None,
        }
    }

    fn signed_in() -> AuthSnapshot {
        AuthSnapshot {
            loading: false,
            user: Some(User {
                id: "user-1".to_string(),
                email: Some("user@example.com".to_string()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn starts_loading_then_lands() {
        let mut router = Router::new();
        assert_eq!(router.view(), View::Loading);

        router.apply(signed_out());
        assert_eq!(router.view(), View::Landing);
    }

    #[test]
    fn loading_resolves_straight_to_dashboard_for_a_present_user() {
        let mut router = Router::new();
        router.apply(signed_in());
        assert_eq!(router.view(), View::Dashboard);
    }

    #[test]
    fn unauthenticated_never_sees_the_dashboard() {
        let mut router = Router::new();
        router.apply(signed_out());

        router.get_started();
        assert_eq!(router.view(), View::Auth(AuthMode::Login));
        router.switch_to_register();
        assert_eq!(router.view(), View::Auth(AuthMode::Register));
        router.switch_to_login();
        assert_eq!(router.view(), View::Auth(AuthMode::Login));
        router.back_to_landing();
        assert_eq!(router.view(), View::Landing);
    }

    #[test]
    fn auth_state_dominates_local_flags() {
        let mut router = Router::new();
        router.apply(signed_out());
        router.get_started();
        router.switch_to_register();

        router.apply(signed_in());
        assert_eq!(router.view(), View::Dashboard);

        // flags set while signed in change nothing
        router.get_started();
        assert_eq!(router.view(), View::Dashboard);
    }

    #[test]
    fn signing_out_returns_to_landing_not_a_stale_form() {
        let mut router = Router::new();
        router.apply(signed_out());
        router.get_started();
        router.switch_to_register();
        router.apply(signed_in());

        router.apply(signed_out());
        assert_eq!(router.view(), View::Landing);
    }

    #[tokio::test]
    async fn drive_follows_a_subscription() {
        let (tx, rx) = tokio::sync::watch::channel(AuthSnapshot::default());
        let mut router = Router::new();

        let handle = tokio::spawn(async move {
            router.drive(rx).await;
            router
        });

        tx.send_replace(signed_in());
        drop(tx);

        let router = handle.await.unwrap();
        assert_eq!(router.view(), View::Dashboard);
    }
}
