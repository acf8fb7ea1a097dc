use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use notes_web::{config::Config, create_router, db, AppState};
use tower::ServiceExt;

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

/// Drives the router like a browser would, keeping cookies between requests.
struct Client {
    app: Router,
    cookies: HashMap<String, String>,
}

impl Client {
    async fn new() -> Self {
        let config = Config::from_lookup(|name| match name {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "SECRET_KEY" => Some("test-secret".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = db::connect(&config.database_url).await.unwrap();
        db::bootstrap(&pool).await.unwrap();
        let app = create_router(Arc::new(AppState::new(config, pool)));
        Client {
            app,
            cookies: HashMap::new(),
        }
    }

    /// A second browser talking to the same server.
    fn fresh_browser(&self) -> Self {
        Client {
            app: self.app.clone(),
            cookies: HashMap::new(),
        }
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<&str>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let cookie_header = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie_header);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().unwrap();
            let pair = set_cookie.split(';').next().unwrap();
            let (name, value) = pair.split_once('=').unwrap();
            if value.is_empty() || set_cookie.contains("Max-Age=0") {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        Reply {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(&mut self, uri: &str) -> Reply {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Reply {
        self.send(Method::POST, uri, Some(form)).await
    }

    async fn follow(&mut self, reply: Reply) -> Reply {
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
        let location = reply.location.expect("redirect without location");
        self.get(&location).await
    }

    async fn register_and_login(&mut self, username: &str, password: &str) {
        let reply = self
            .post(
                "/register",
                &format!("username={username}&email={username}%40x.com&password={password}"),
            )
            .await;
        assert_eq!(reply.location.as_deref(), Some("/login"));
        let reply = self
            .post("/login", &format!("username={username}&password={password}"))
            .await;
        assert_eq!(reply.location.as_deref(), Some("/viewall"));
        assert!(self.cookies.contains_key("token"));
    }
}

fn note_count(page: &str) -> usize {
    page.matches("<article class=\"note\">").count()
}

fn first_note_id(page: &str) -> i64 {
    let start = page.find("/viewnotes/").expect("no note link") + "/viewnotes/".len();
    page[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap()
}

#[tokio::test]
async fn full_note_lifecycle() {
    let mut client = Client::new().await;

    let reply = client
        .post("/register", "username=alice&email=a%40x.com&password=pw1")
        .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/login"));
    let page = client.follow(reply).await;
    assert!(page.body.contains("Registration successful. Please log in."));

    let reply = client.post("/login", "username=alice&password=pw1").await;
    assert_eq!(reply.location.as_deref(), Some("/viewall"));
    let page = client.follow(reply).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Welcome alice"));
    assert_eq!(note_count(&page.body), 0);

    let reply = client.post("/addnote", "title=T&content=C").await;
    assert_eq!(reply.location.as_deref(), Some("/viewall"));
    let page = client.follow(reply).await;
    assert!(page.body.contains("Note added successfully."));
    assert_eq!(note_count(&page.body), 1);
    assert!(page.body.contains(">T</a>"));
    let note_id = first_note_id(&page.body);

    let page = client.get(&format!("/viewnotes/{note_id}")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<h1>T</h1>"));

    let page = client.get(&format!("/updatenote/{note_id}")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("value=\"T\""));

    let reply = client
        .post(&format!("/updatenote/{note_id}"), "title=T2&content=C2")
        .await;
    assert_eq!(reply.location.as_deref(), Some("/viewall"));
    let page = client.follow(reply).await;
    assert!(page.body.contains("Note updated successfully."));
    assert_eq!(note_count(&page.body), 1);
    assert!(page.body.contains(">T2</a>"));
    assert!(!page.body.contains(">T</a>"));

    let reply = client.post(&format!("/deletenote/{note_id}"), "").await;
    assert_eq!(reply.location.as_deref(), Some("/viewall"));
    let page = client.follow(reply).await;
    assert!(page.body.contains("Note deleted."));
    assert_eq!(note_count(&page.body), 0);
}

#[tokio::test]
async fn unknown_user_cannot_log_in() {
    let mut client = Client::new().await;

    let reply = client.post("/login", "username=ghost&password=pw1").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/login"));
    assert!(!client.cookies.contains_key("token"));

    let page = client.follow(reply).await;
    assert!(page.body.contains("Invalid username or password."));

    let reply = client.get("/viewall").await;
    assert_eq!(reply.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn wrong_password_gets_the_same_message() {
    let mut client = Client::new().await;
    client
        .post("/register", "username=alice&email=a%40x.com&password=pw1")
        .await;

    let reply = client.post("/login", "username=alice&password=pw2").await;
    assert_eq!(reply.location.as_deref(), Some("/login"));
    assert!(!client.cookies.contains_key("token"));
    let page = client.follow(reply).await;
    assert!(page.body.contains("Invalid username or password."));
}

#[tokio::test]
async fn duplicate_registration_is_reported() {
    let mut client = Client::new().await;
    client
        .post("/register", "username=alice&email=a%40x.com&password=pw1")
        .await;

    let reply = client
        .post("/register", "username=alice&email=b%40x.com&password=pw2")
        .await;
    assert_eq!(reply.location.as_deref(), Some("/register"));
    let page = client.follow(reply).await;
    assert!(page.body.contains("Username already exists."));

    // The first registration is untouched.
    let reply = client.post("/login", "username=alice&password=pw1").await;
    assert_eq!(reply.location.as_deref(), Some("/viewall"));
}

#[tokio::test]
async fn incomplete_forms_redirect_back() {
    let mut client = Client::new().await;

    let reply = client.post("/register", "username=alice&email=&password=pw1").await;
    assert_eq!(reply.location.as_deref(), Some("/register"));
    let page = client.follow(reply).await;
    assert!(page.body.contains("Please fill out all fields."));

    let reply = client.post("/login", "username=alice").await;
    assert_eq!(reply.location.as_deref(), Some("/login"));

    client.register_and_login("alice", "pw1").await;
    let reply = client.post("/addnote", "title=+++&content=C").await;
    assert_eq!(reply.location.as_deref(), Some("/addnote"));
    let page = client.follow(reply).await;
    assert!(page.body.contains("Title and content cannot be empty."));

    let page = client.get("/viewall").await;
    assert_eq!(note_count(&page.body), 0);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let mut client = Client::new().await;

    let reply = client.get("/").await;
    assert_eq!(reply.location.as_deref(), Some("/login"));

    for uri in ["/viewall", "/addnote", "/viewnotes/1", "/updatenote/1"] {
        let reply = client.get(uri).await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(reply.location.as_deref(), Some("/login"), "{uri}");
    }
    let reply = client.post("/deletenote/1", "").await;
    assert_eq!(reply.location.as_deref(), Some("/login"));
    let reply = client.post("/addnote", "title=T&content=C").await;
    assert_eq!(reply.location.as_deref(), Some("/login"));

    let page = client.get("/login").await;
    assert!(page.body.contains("Please log in to continue."));
}

#[tokio::test]
async fn notes_of_other_users_stay_hidden() {
    let mut alice = Client::new().await;
    alice.register_and_login("alice", "pw1").await;
    alice.post("/addnote", "title=secret&content=diary").await;
    let page = alice.get("/viewall").await;
    let note_id = first_note_id(&page.body);

    let mut bob = alice.fresh_browser();
    bob.register_and_login("bob", "pw2").await;

    let page = bob.get("/viewall").await;
    assert_eq!(note_count(&page.body), 0);
    assert!(!page.body.contains("secret"));

    let reply = bob.get(&format!("/viewnotes/{note_id}")).await;
    assert_eq!(reply.location.as_deref(), Some("/viewall"));
    let foreign = bob.follow(reply).await;
    let reply = bob.get("/viewnotes/9999").await;
    let missing = bob.follow(reply).await;
    assert!(foreign.body.contains("You don&#x27;t have access to this note."));
    assert_eq!(foreign.body, missing.body);

    let reply = bob.get(&format!("/updatenote/{note_id}")).await;
    assert_eq!(reply.location.as_deref(), Some("/viewall"));
    let reply = bob
        .post(&format!("/updatenote/{note_id}"), "title=pwned&content=x")
        .await;
    assert_eq!(reply.location.as_deref(), Some("/viewall"));
    let page = bob.follow(reply).await;
    assert!(page.body.contains("You are not authorized to edit this note."));

    let reply = bob.post(&format!("/deletenote/{note_id}"), "").await;
    let page = bob.follow(reply).await;
    assert!(page.body.contains("You are not authorized to delete this note."));

    let page = alice.get(&format!("/viewnotes/{note_id}")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<h1>secret</h1>"));
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let mut client = Client::new().await;
    client.register_and_login("alice", "pw1").await;
    let stolen = client.cookies.get("token").cloned().unwrap();

    let reply = client.get("/").await;
    assert_eq!(reply.location.as_deref(), Some("/viewall"));

    let reply = client.get("/logout").await;
    assert_eq!(reply.location.as_deref(), Some("/login"));
    assert!(!client.cookies.contains_key("token"));
    let page = client.follow(reply).await;
    assert!(page.body.contains("You have been logged out."));

    let mut replay = client.fresh_browser();
    replay.cookies.insert("token".to_string(), stolen);
    let reply = replay.get("/viewall").await;
    assert_eq!(reply.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn flash_is_shown_once() {
    let mut client = Client::new().await;
    client.register_and_login("alice", "pw1").await;

    let page = client.get("/viewall").await;
    assert!(page.body.contains("Welcome alice"));
    let page = client.get("/viewall").await;
    assert!(!page.body.contains("Welcome alice"));
}
