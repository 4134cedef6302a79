use crate::*;
use async_trait::async_trait;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, CookieJar, Key, SameSite, SignedCookieJar};
use chrono::{Duration, Utc};
use clinic_core::config::SessionConfig;
use clinic_core::{ClinicError, Credentials, LoginGrant, Result};
use std::sync::Arc;

struct StubAuth;

#[async_trait]
impl Authenticator for StubAuth {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginGrant> {
        match (credentials.email.as_str(), credentials.password.as_str()) {
            ("admin@example.com", "password123") => Ok(LoginGrant {
                token: "abc".into(),
                user_id: Some("u1".into()),
                clinic_id: Some("c1".into()),
                role_id: Some("r1".into()),
            }),
            ("down@example.com", _) => Err(ClinicError::ConnectionFailed("refused".into())),
            _ => Err(ClinicError::InvalidCredentials("Credenciais inválidas".into())),
        }
    }
}

fn config() -> SessionConfig {
    SessionConfig::default()
}

fn admin() -> AdminSessions {
    AdminSessions::new(Arc::new(StubAuth), CookiePolicy::admin(&config()))
}

fn clinician() -> ClinicianSessions {
    ClinicianSessions::new(Arc::new(StubAuth), CookiePolicy::clinician(&config()))
}

fn key(byte: u8) -> Key {
    Key::from(&[byte; 64])
}

fn good() -> Credentials {
    Credentials::new("admin@example.com", "password123")
}

/// Turn the `Set-Cookie` headers of a jar into a request `Cookie` header.
fn replay(jar: impl IntoResponse) -> HeaderMap {
    let resp = jar.into_response();
    let pairs: Vec<String> = resp
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| Cookie::parse(v.to_string()).ok())
        .map(|c| format!("{}={}", c.name(), c.value()))
        .collect();
    let mut headers = HeaderMap::new();
    if !pairs.is_empty() {
        headers.insert(COOKIE, pairs.join("; ").parse().unwrap());
    }
    headers
}

// ========== Cookie policy ==========

#[test]
fn test_cookie_attributes() {
    let mut cfg = config();
    cfg.secure = true;
    let cookie = CookiePolicy::admin(&cfg).issue("abc".into());
    assert_eq!(cookie.name(), "adminSessionToken");
    assert_eq!(cookie.value(), "abc");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
}

#[test]
fn test_cookie_not_secure_outside_production() {
    let cookie = CookiePolicy::admin(&config()).issue("abc".into());
    assert_ne!(cookie.secure(), Some(true));
}

// ========== Admin sessions ==========

#[tokio::test]
async fn test_admin_login_sets_token_cookie() {
    let sessions = admin();
    let (jar, session) = sessions.login(CookieJar::new(), &good()).await.unwrap();
    assert_eq!(session.backend_token, "abc");
    assert_eq!(jar.get("adminSessionToken").unwrap().value(), "abc");
    assert_eq!(sessions.current_session(&jar).unwrap().bearer(), "abc");
}

#[tokio::test]
async fn test_admin_login_rejected_leaves_jar_untouched() {
    let sessions = admin();
    let jar = CookieJar::new();
    let err = sessions
        .login(jar.clone(), &Credentials::new("x@x.com", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClinicError::InvalidCredentials(m) if m == "Credenciais inválidas"));
    assert!(jar.get("adminSessionToken").is_none());
    assert!(replay(jar).get(COOKIE).is_none());
}

#[tokio::test]
async fn test_admin_login_connection_failure() {
    let err = admin()
        .login(CookieJar::new(), &Credentials::new("down@example.com", "password123"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClinicError::ConnectionFailed(_)));
}

#[test]
fn test_admin_session_from_request_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, "adminSessionToken=tok-1; other=x".parse().unwrap());
    let jar = CookieJar::from_headers(&headers);
    let session = admin().current_session(&jar).unwrap();
    assert_eq!(session.backend_token, "tok-1");
    assert!(session.user_id.is_none());
}

#[test]
fn test_admin_empty_cookie_is_no_session() {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, "adminSessionToken=".parse().unwrap());
    assert!(admin().current_session(&CookieJar::from_headers(&headers)).is_none());
}

#[tokio::test]
async fn test_admin_double_logout() {
    let sessions = admin();
    let (jar, _) = sessions.login(CookieJar::new(), &good()).await.unwrap();
    let jar = sessions.logout(jar);
    assert!(sessions.current_session(&jar).is_none());
    let jar = sessions.logout(jar);
    assert!(sessions.current_session(&jar).is_none());
}

#[test]
fn test_admin_logout_emits_expiring_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, "adminSessionToken=tok-1".parse().unwrap());
    let jar = admin().logout(CookieJar::from_headers(&headers));
    let resp = jar.into_response();
    let set = resp.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
    let cookie = Cookie::parse(set).unwrap();
    assert_eq!(cookie.name(), "adminSessionToken");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
}

// ========== Clinician sessions ==========

#[tokio::test]
async fn test_clinician_login_roundtrip_through_headers() {
    let sessions = clinician();
    let (jar, session) = sessions.login(SignedCookieJar::new(key(1)), &good()).await.unwrap();
    assert_eq!(session.user_id.as_deref(), Some("u1"));
    assert!(session.issued_at.is_some());

    let headers = replay(jar);
    let jar = SignedCookieJar::from_headers(&headers, key(1));
    let restored = sessions.current_session(&jar).unwrap();
    assert_eq!(restored, session);
}

#[tokio::test]
async fn test_clinician_cookie_carries_encoded_session() {
    let sessions = clinician();
    let (jar, session) = sessions.login(SignedCookieJar::new(key(1)), &good()).await.unwrap();
    let cookie = jar.get("clinicianSession").unwrap();
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.value(), session.encode().unwrap());
    assert_eq!(Session::decode(cookie.value()), Some(session));
}

#[tokio::test]
async fn test_clinician_cookie_signed_with_other_key_is_rejected() {
    let sessions = clinician();
    let (jar, _) = sessions.login(SignedCookieJar::new(key(1)), &good()).await.unwrap();
    let headers = replay(jar);
    let jar = SignedCookieJar::from_headers(&headers, key(2));
    assert!(sessions.current_session(&jar).is_none());
}

#[test]
fn test_clinician_forged_cookie_is_rejected() {
    let forged = Session::from_token("stolen").encode().unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, format!("clinicianSession={forged}").parse().unwrap());
    let jar = SignedCookieJar::from_headers(&headers, key(1));
    assert!(clinician().current_session(&jar).is_none());
}

#[tokio::test]
async fn test_clinician_session_expires() {
    let sessions = clinician();
    let (jar, _) = sessions.login(SignedCookieJar::new(key(1)), &good()).await.unwrap();
    let later = Utc::now() + Duration::hours(2);
    assert!(sessions.current_session_at(&jar, later).is_none());
}

#[tokio::test]
async fn test_clinician_resume_refreshes_after_half_life() {
    let sessions = clinician();
    let (jar, original) = sessions.login(SignedCookieJar::new(key(1)), &good()).await.unwrap();
    let issued = original.issued_at.unwrap();

    let soon = issued + Duration::minutes(10);
    let (jar, same) = sessions.resume_at(jar, soon).unwrap();
    assert_eq!(same.issued_at, Some(issued));

    let later = issued + Duration::minutes(40);
    let (jar, refreshed) = sessions.resume_at(jar, later).unwrap();
    assert_eq!(refreshed.issued_at, Some(later));
    assert_eq!(refreshed.backend_token, "abc");

    // Still valid past the original expiry thanks to the refresh.
    let past_original = issued + Duration::minutes(70);
    assert!(sessions.current_session_at(&jar, past_original).is_some());
}

#[tokio::test]
async fn test_clinician_double_logout() {
    let sessions = clinician();
    let (jar, _) = sessions.login(SignedCookieJar::new(key(1)), &good()).await.unwrap();
    let jar = sessions.logout(jar);
    assert!(sessions.current_session(&jar).is_none());
    let jar = sessions.logout(jar);
    assert!(sessions.current_session(&jar).is_none());
}

// ========== Session payload ==========

#[test]
fn test_session_decode_rejects_other_versions() {
    let mut s = Session::from_token("abc");
    assert_eq!(Session::decode(&s.encode().unwrap()), Some(s.clone()));
    s.version = SESSION_VERSION + 1;
    assert!(Session::decode(&s.encode().unwrap()).is_none());
    assert!(Session::decode("not json").is_none());
    assert!(Session::decode(&Session::from_token("").encode().unwrap()).is_none());
}

#[test]
fn test_session_without_issue_time_never_expires() {
    let s = Session::from_token("abc");
    assert!(!s.is_expired_at(Duration::seconds(1), Utc::now() + Duration::days(30)));
    assert!(!s.needs_refresh_at(Duration::seconds(1), Utc::now()));
}

#[test]
fn test_session_expiry_overflow_does_not_panic() {
    let s = Session::from_grant(LoginGrant::token_only("abc"), Utc::now());
    let huge = Duration::MAX;
    assert_eq!(s.expires_at(huge), None);
    assert!(s.is_expired_at(huge, Utc::now()));
    assert!(!s.needs_refresh_at(huge, Utc::now()));
}

#[tokio::test]
async fn test_clinician_huge_max_age_reads_without_panic() {
    let mut cfg = config();
    cfg.max_age_secs = 10_000_000_000_000;
    let sessions = ClinicianSessions::new(Arc::new(StubAuth), CookiePolicy::clinician(&cfg));
    let (jar, _) = sessions.login(SignedCookieJar::new(key(1)), &good()).await.unwrap();
    assert!(sessions.current_session(&jar).is_none());
    assert!(sessions.resume(jar).is_none());
}

#[test]
fn test_session_debug_hides_token() {
    assert!(!format!("{:?}", Session::from_token("secret-token")).contains("secret-token"));
}

// ========== Route guard ==========

#[test]
fn test_guard_redirects_protected_admin_path_without_cookie() {
    let rule = GuardRule::admin("adminSessionToken");
    assert_eq!(
        rule.decide("/admin/pacientes", false),
        GuardDecision::Redirect("/admin/login".into())
    );
    assert_eq!(rule.decide("/admin", false), GuardDecision::Redirect("/admin/login".into()));
    assert_eq!(rule.decide("/admin/pacientes/7/edit", true), GuardDecision::Proceed);
}

#[test]
fn test_guard_login_page() {
    let rule = GuardRule::admin("adminSessionToken");
    assert_eq!(rule.decide("/admin/login", false), GuardDecision::Proceed);
    assert_eq!(
        rule.decide("/admin/login", true),
        GuardDecision::Redirect("/admin/dashboard".into())
    );
    // Exact match only; a trailing slash is an ordinary protected path.
    assert_eq!(rule.decide("/admin/login/", true), GuardDecision::Proceed);
    assert_eq!(
        rule.decide("/admin/login/", false),
        GuardDecision::Redirect("/admin/login".into())
    );
}

#[test]
fn test_guard_segment_boundaries() {
    let rule = GuardRule::admin("adminSessionToken");
    assert_eq!(rule.decide("/administration", false), GuardDecision::Proceed);
    assert_eq!(rule.decide("/", false), GuardDecision::Proceed);
    assert_eq!(rule.decide("/health", false), GuardDecision::Proceed);
}

#[test]
fn test_guard_combines_areas() {
    let guard = Guard::new(vec![
        GuardRule::admin("adminSessionToken"),
        GuardRule::clinician("clinicianSession"),
    ]);
    let only_admin = |name: &str| name == "adminSessionToken";

    assert_eq!(guard.decide("/admin/dashboard", only_admin), GuardDecision::Proceed);
    assert_eq!(
        guard.decide("/patients/3", only_admin),
        GuardDecision::Redirect("/login".into())
    );
    assert_eq!(guard.decide("/login", only_admin), GuardDecision::Proceed);
    assert_eq!(
        guard.decide("/login", |_| true),
        GuardDecision::Redirect("/dashboard".into())
    );
}
