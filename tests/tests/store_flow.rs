use agora_client::{
    api::{Error, NewComment, NewPost, NewSession, VoteValue},
    CommentTree, ImageUpload, Session, Store, VoteOutcome, VoteTally,
};
use agora_mock_server::MockServer;

async fn session(server: &mut MockServer, who: &str, pass: &str) -> Session {
    server
        .auth(NewSession::new(
            who.to_string(),
            pass.to_string(),
            String::from("integration-tests"),
        ))
        .await
        .unwrap()
}

fn post_body(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: String::from("some content"),
        community_id: None,
        avatar_url: None,
    }
}

#[tokio::test]
async fn votes_from_different_users_tally_independently() {
    let mut server = MockServer::new();
    server.admin_create_user("alice", "swordfish", None).unwrap();
    server.admin_create_user("bob", "hunter2", None).unwrap();
    let alice = session(&mut server, "alice", "swordfish").await;
    let bob = session(&mut server, "bob", "hunter2").await;

    let post = server
        .create_post(alice.token, post_body("contested"), None)
        .await
        .unwrap();

    assert_eq!(
        server
            .cast_vote(alice.token, post.id, VoteValue::Up)
            .await
            .unwrap(),
        VoteOutcome::Inserted
    );
    assert_eq!(
        server
            .cast_vote(bob.token, post.id, VoteValue::Down)
            .await
            .unwrap(),
        VoteOutcome::Inserted
    );

    let votes = server.fetch_votes(post.id).await.unwrap();
    let as_alice = VoteTally::of(&votes, Some(alice.user_id()));
    assert_eq!((as_alice.likes, as_alice.dislikes), (1, 1));
    assert_eq!(as_alice.own_vote, Some(VoteValue::Up));
    let as_bob = VoteTally::of(&votes, Some(bob.user_id()));
    assert_eq!(as_bob.own_vote, Some(VoteValue::Down));

    // alice taking her vote back leaves bob's alone
    assert_eq!(
        server
            .cast_vote(alice.token, post.id, VoteValue::Up)
            .await
            .unwrap(),
        VoteOutcome::Removed
    );
    assert_eq!(server.vote_count(post.id).await.unwrap(), 1);
}

#[tokio::test]
async fn image_uploads_land_in_the_bucket() {
    let mut server = MockServer::new();
    server.admin_create_user("alice", "swordfish", None).unwrap();
    let alice = session(&mut server, "alice", "swordfish").await;

    let post = server
        .create_post(
            alice.token,
            post_body("Cat appreciation"),
            Some(ImageUpload {
                file_name: String::from("my cat!.png"),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            }),
        )
        .await
        .unwrap();

    let url = post.image_url.as_deref().unwrap();
    let path = url.strip_prefix("mock://post-images/").unwrap();
    assert!(path.starts_with("Cat_appreciation-"));
    assert!(path.ends_with("-my_cat_.png"));
    assert_eq!(
        server.stored_object(path).unwrap(),
        &[0x89, 0x50, 0x4e, 0x47]
    );

    let without = server
        .create_post(alice.token, post_body("no image"), None)
        .await
        .unwrap();
    assert_eq!(without.image_url, None);
}

#[tokio::test]
async fn revoked_tokens_stop_working() {
    let mut server = MockServer::new();
    server.admin_create_user("alice", "swordfish", None).unwrap();
    let alice = session(&mut server, "alice", "swordfish").await;

    server.unauth(alice.token).await.unwrap();
    assert_eq!(
        server
            .create_post(alice.token, post_body("too late"), None)
            .await,
        Err(Error::PermissionDenied)
    );
    assert_eq!(server.unauth(alice.token).await, Err(Error::PermissionDenied));
}

#[tokio::test]
async fn impersonating_comment_authors_is_refused() {
    let mut server = MockServer::new();
    server.admin_create_user("alice", "swordfish", None).unwrap();
    server.admin_create_user("bob", "hunter2", None).unwrap();
    let alice = session(&mut server, "alice", "swordfish").await;
    let bob = session(&mut server, "bob", "hunter2").await;

    let post = server
        .create_post(alice.token, post_body("hello"), None)
        .await
        .unwrap();
    let forged = NewComment {
        content: String::from("says bob"),
        parent_id: None,
        author_id: bob.user_id(),
        author_name: String::from("bob"),
    };
    assert_eq!(
        server.create_comment(alice.token, post.id, forged).await,
        Err(Error::PermissionDenied)
    );
}

#[tokio::test]
async fn wire_payloads_build_the_same_tree() {
    let mut server = MockServer::new();
    server.admin_create_user("alice", "swordfish", None).unwrap();
    let alice = session(&mut server, "alice", "swordfish").await;
    let post = server
        .create_post(alice.token, post_body("hello"), None)
        .await
        .unwrap();

    let top = server
        .create_comment(
            alice.token,
            post.id,
            NewComment {
                content: String::from("top"),
                parent_id: None,
                author_id: alice.user_id(),
                author_name: String::from("alice"),
            },
        )
        .await
        .unwrap();
    server
        .create_comment(
            alice.token,
            post.id,
            NewComment {
                content: String::from("reply"),
                parent_id: Some(top.id),
                author_id: alice.user_id(),
                author_name: String::from("alice"),
            },
        )
        .await
        .unwrap();

    let flat = server.fetch_comments(post.id).await.unwrap();
    let as_json = serde_json::to_value(&flat).unwrap();
    assert_eq!(CommentTree::from_json(&as_json), CommentTree::build(&flat));
    assert_eq!(CommentTree::from_json(&as_json).len(), 2);
}
