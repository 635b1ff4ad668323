use gymgroup_client::GymClientError;
use gymgroup_client::config::Config;
use gymgroup_client::http_client::GymClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> Config {
    Config::from_env_with(|k| match k {
        "GYMGROUP_EMAIL" => Some("member@example.com".into()),
        "GYMGROUP_PIN" => Some("12345678".into()),
        "GYMGROUP_BASE_URL" => Some(base_url.into()),
        _ => None,
    })
    .expect("config")
}

const LOGIN_PAGE: &str = r#"<html><body><form action="/login/" method="post">
<input name="email" type="text" />
<input name="pin" type="password" />
<input name="forgeryToken" id="forgeryToken" type="hidden" value="tok123" />
</form></body></html>"#;

#[tokio::test]
async fn login_scrapes_token_and_posts_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Welcome back, Member</h1>"))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = GymClient::new(&config.base_url).expect("client");
    client.login(&config).await.expect("login");

    let received = server.received_requests().await.unwrap();
    let post = received
        .iter()
        .find(|r| r.method.to_string() == "POST")
        .expect("login POST was sent");
    let body = String::from_utf8(post.body.clone()).expect("utf8 form body");
    assert!(body.contains("forgeryToken=tok123"));
    assert!(body.contains("pin=12345678"));
    assert!(body.contains("email=member%40example.com"));
}

#[tokio::test]
async fn login_fails_without_welcome_marker() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Incorrect email address or PIN"),
        )
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = GymClient::new(&config.base_url).expect("client");
    let res = client.login(&config).await;
    assert!(matches!(res, Err(GymClientError::Login(_))));
}

#[tokio::test]
async fn login_fails_when_token_is_missing_and_never_posts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let client = GymClient::new(&config.base_url).expect("client");
    let res = client.login(&config).await;
    assert!(matches!(res, Err(GymClientError::Login(_))));

    let received = server.received_requests().await.unwrap();
    assert!(received.iter().all(|r| r.method.to_string() != "POST"));
}
