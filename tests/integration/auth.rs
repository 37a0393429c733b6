use crate::common::{TestApp, routes};

mod register {
    use super::*;

    #[tokio::test]
    async fn register_returns_created_user() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &serde_json::json!({"username": "alice", "password": "pass1234"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["username"].as_str().unwrap(), "alice");
        assert!(res.body["id"].as_i64().is_some());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let app = TestApp::spawn().await;
        let body = serde_json::json!({"username": "bob", "password": "pass1234"});

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201);

        let second = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"].as_str().unwrap(), "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &serde_json::json!({"username": "carol", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"].as_str().unwrap(), "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn wrong_password_unauthorized() {
        let app = TestApp::spawn().await;
        app.post_without_token(
            routes::REGISTER,
            &serde_json::json!({"username": "dave", "password": "pass1234"}),
        )
        .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({"username": "dave", "password": "wrong-pass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"].as_str().unwrap(), "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_user_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({"username": "nobody", "password": "pass1234"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"].as_str().unwrap(), "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn login_returns_role_permissions() {
        let app = TestApp::spawn().await;
        let body = serde_json::json!({"username": "erin", "password": "pass1234"});
        app.post_without_token(routes::REGISTER, &body).await;

        let res = app.post_without_token(routes::LOGIN, &body).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["role"].as_str().unwrap(), "author");

        let permissions: Vec<&str> = res.body["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_str().unwrap())
            .collect();
        assert!(permissions.contains(&"asset:create"));
        assert!(permissions.contains(&"asset:edit"));
        assert!(!permissions.contains(&"asset:view"));
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn me_returns_profile() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_role("frank", "pass1234", "administrator")
            .await;

        let res = app.get_with_token(routes::ME, &token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"].as_str().unwrap(), "frank");
        assert_eq!(res.body["role"].as_str().unwrap(), "administrator");
    }

    #[tokio::test]
    async fn me_without_token_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"].as_str().unwrap(), "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn me_with_garbage_token_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-real-token").await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"].as_str().unwrap(), "TOKEN_INVALID");
    }
}
