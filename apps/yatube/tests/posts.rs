mod common;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};

use common::{SMALL_GIF, body_text, create_group, create_post, create_user, session, test_state};
use yatube_core::domain::PostFilter;
use yatube_core::pagination::PageRequest;
use yatube_core::ports::BaseRepository;

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_create_post_adds_one_and_redirects_to_profile() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    let group = create_group(&state, "Cats", "cats").await;
    let before = state.posts.count(PostFilter::All).await.unwrap();

    let group_id = group.id.to_string();
    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(session(&state, &author))
        .set_form([("text", "A brand new post"), ("group", group_id.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo/");
    assert_eq!(state.posts.count(PostFilter::All).await.unwrap(), before + 1);

    let page = state
        .posts
        .page(PostFilter::All, PageRequest::first(10))
        .await
        .unwrap();
    let entry = &page.items[0];
    assert_eq!(entry.post.text, "A brand new post");
    assert_eq!(entry.author.username, "leo");
    assert_eq!(entry.group.as_ref().map(|g| g.slug.as_str()), Some("cats"));
}

#[actix_web::test]
async fn test_invalid_post_rerenders_form() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(session(&state, &author))
        .set_form([("text", "   "), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.posts.count(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_anonymous_create_redirects_to_login() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;

    let req = test::TestRequest::get().uri("/create/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");

    let req = test::TestRequest::post()
        .uri("/create/")
        .set_form([("text", "sneaky"), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(state.posts.count(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_author_edits_post_in_place() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    let group = create_group(&state, "Cats", "cats").await;
    let post = create_post(&state, &author, "First draft", Some(&group)).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(session(&state, &author))
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(body.contains("First draft"));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(session(&state, &author))
        .set_form([("text", "Final text"), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    assert_eq!(state.posts.count(PostFilter::All).await.unwrap(), 1);

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Final text");
    assert_eq!(stored.group_id, None);
    assert_eq!(stored.created_at, post.created_at);
}

#[actix_web::test]
async fn test_non_author_cannot_edit() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    let stranger = create_user(&state, "mallory").await;
    let post = create_post(&state, &author, "Mine", None).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(session(&state, &stranger))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(session(&state, &stranger))
        .set_form([("text", "Not yours anymore"), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Mine");
}

#[actix_web::test]
async fn test_post_detail_shows_post_and_comments() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    let reader = create_user(&state, "mia").await;
    let post = create_post(&state, &author, "Detail body", None).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .cookie(session(&state, &reader))
        .set_form([("text", "Nice one")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(body.contains("Detail body"));
    assert!(body.contains("Nice one"));
    assert!(body.contains("mia"));
}

#[actix_web::test]
async fn test_guest_comment_is_not_stored() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    let post = create_post(&state, &author, "Quiet post", None).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .set_form([("text", "Drive-by")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        format!("/auth/login/?next=/posts/{}/comment/", post.id)
    );
    assert!(state.comments.list_for_post(post.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_empty_comment_is_ignored() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    let post = create_post(&state, &author, "Quiet post", None).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .cookie(session(&state, &author))
        .set_form([("text", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(state.comments.list_for_post(post.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_unknown_pages_are_not_found() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;
    create_post(&state, &author, "Exists", None).await;

    for uri in [
        "/group/no-such-group/",
        "/profile/nobody/",
        "/posts/999/",
        "/posts/abc/",
        "/posts/99999999999999/",
        "/unexisting_page/",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_image_upload_is_stored_and_served() {
    let (state, media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;

    let boundary = "yatube-test-boundary";
    let mut payload = Vec::new();
    payload.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\nPost with a picture\r\n"
        )
        .as_bytes(),
    );
    payload.extend_from_slice(
        format!("--{boundary}\r\nContent-Disposition: form-data; name=\"group\"\r\n\r\n\r\n")
            .as_bytes(),
    );
    payload.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"small.gif\"\r\nContent-Type: image/gif\r\n\r\n"
        )
        .as_bytes(),
    );
    payload.extend_from_slice(SMALL_GIF);
    payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(session(&state, &author))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let page = state
        .posts
        .page(PostFilter::All, PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].post.image.as_deref(), Some("posts/small.gif"));
    assert!(media.path().join("posts/small.gif").exists());

    let req = test::TestRequest::get()
        .uri("/media/posts/small.gif")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/gif"
    );
    assert_eq!(test::read_body(resp).await.as_ref(), SMALL_GIF);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", page.items[0].post.id))
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(body.contains("small.gif"));
}

#[actix_web::test]
async fn test_non_image_upload_is_rejected() {
    let (state, _media) = test_state();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;
    let author = create_user(&state, "leo").await;

    let boundary = "yatube-test-boundary";
    let payload = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\nHello\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\nnot a picture\r\n\
         --{boundary}--\r\n"
    );

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(session(&state, &author))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.posts.count(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_media_directory_is_not_found() {
    let (state, media) = test_state();
    std::fs::create_dir_all(media.path().join("posts")).unwrap();
    let app = test::init_service(App::new().configure(yatube::configure_app(state.clone()))).await;

    for uri in ["/media/posts", "/media/posts/", "/media/posts/missing.gif"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}
