mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test};

use common::{body_text, card_count, create_group, create_post, create_user, session, test_state};
use yatube::handlers::index_cache_key;
use yatube_core::pagination::PageRequest;
use yatube_core::ports::Cache;

#[actix_web::test]
async fn test_listings_paginate_by_ten() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    let group = create_group(&state, "Cats", "cats").await;
    for i in 0..16 {
        create_post(&state, &author, &format!("Post number {i}"), Some(&group)).await;
    }

    for base in ["/", "/group/cats/", "/profile/leo/"] {
        let req = test::TestRequest::get().uri(base).to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(card_count(&body), 10, "first page of {base}");

        let req = test::TestRequest::get()
            .uri(&format!("{base}?page=2"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(card_count(&body), 6, "second page of {base}");
    }
}

#[actix_web::test]
async fn test_page_number_is_clamped() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    for i in 0..12 {
        create_post(&state, &author, &format!("Post number {i}"), None).await;
    }

    let cases = [("abc", 10), ("99", 2), ("0", 2), ("-3", 2)];
    for (page, expected) in cases {
        let req = test::TestRequest::get()
            .uri(&format!("/profile/leo/?page={page}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(card_count(&body), expected, "page={page}");
    }
}

#[actix_web::test]
async fn test_repeated_page_parameter_uses_last_value() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    let group = create_group(&state, "Cats", "cats").await;
    for i in 0..16 {
        create_post(&state, &author, &format!("Post number {i}"), Some(&group)).await;
    }

    for base in ["/", "/group/cats/", "/profile/leo/"] {
        let req = test::TestRequest::get()
            .uri(&format!("{base}?page=1&page=2"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{base}");
        let body = test::read_body(resp).await;
        assert_eq!(card_count(&body), 6, "{base}");
    }
}

#[actix_web::test]
async fn test_listings_are_newest_first() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    create_post(&state, &author, "Older entry", None).await;
    create_post(&state, &author, "Newer entry", None).await;

    let req = test::TestRequest::get().uri("/profile/leo/").to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    let newer = body.find("Newer entry").unwrap();
    let older = body.find("Older entry").unwrap();
    assert!(newer < older);
}

#[actix_web::test]
async fn test_group_page_lists_only_its_posts() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    let cats = create_group(&state, "Cats", "cats").await;
    create_group(&state, "Dogs", "dogs").await;
    create_post(&state, &author, "About a cat", Some(&cats)).await;

    let req = test::TestRequest::get().uri("/group/cats/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(card_count(&body), 1);
    assert!(body_text(&body).contains("About a cat"));

    let req = test::TestRequest::get().uri("/group/dogs/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(card_count(&test::read_body(resp).await), 0);
}

#[actix_web::test]
async fn test_index_is_cached_until_cleared() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    create_post(&state, &author, "Before caching", None).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let first = test::call_and_read_body(&app, req).await;
    assert!(
        state
            .cache
            .exists(&index_cache_key(None, &PageRequest::parse(None, 10)))
            .await
    );

    create_post(&state, &author, "Fresh after caching", None).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let second = test::call_and_read_body(&app, req).await;
    assert_eq!(first, second);
    assert!(!body_text(&second).contains("Fresh after caching"));

    state.cache.clear().await.unwrap();

    let req = test::TestRequest::get().uri("/").to_request();
    let third = test::call_and_read_body(&app, req).await;
    assert!(body_text(&third).contains("Fresh after caching"));
}

#[actix_web::test]
async fn test_index_cache_is_per_viewer() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    create_post(&state, &author, "Shared post", None).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let anonymous = body_text(&test::call_and_read_body(&app, req).await);
    assert!(anonymous.contains("Log in"));

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(session(&state, &author))
        .to_request();
    let signed_in = body_text(&test::call_and_read_body(&app, req).await);
    assert!(signed_in.contains("Log out"));
    let first_page = PageRequest::parse(None, 10);
    assert!(state.cache.exists(&index_cache_key(Some(author.id), &first_page)).await);
}

#[actix_web::test]
async fn test_junk_index_pages_share_first_page_entry() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    create_post(&state, &author, "Before caching", None).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let first = test::call_and_read_body(&app, req).await;

    create_post(&state, &author, "Fresh after caching", None).await;

    for junk in ["abc", "1abc", "%20", "1.5"] {
        let req = test::TestRequest::get()
            .uri(&format!("/?page={junk}"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, first, "page={junk}");
    }
}
