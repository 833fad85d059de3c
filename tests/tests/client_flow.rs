use std::sync::Arc;

use agora_client::{
    api::{CommentId, Error, NewCommunity, NewPost, NewSession, PostId, VoteValue},
    App, VoteOutcome,
};
use agora_mock_server::MockServer;

fn server_with_users() -> MockServer {
    let mut server = MockServer::new();
    server
        .admin_create_user("alice", "swordfish", Some("https://avatars.test/alice.png"))
        .unwrap();
    server.admin_create_user("bob", "hunter2", None).unwrap();
    server
}

async fn signed_in(who: &str, pass: &str) -> App<MockServer> {
    let mut app = App::new(server_with_users());
    app.sign_in(NewSession::new(
        who.to_string(),
        pass.to_string(),
        String::from("integration-tests"),
    ))
    .await
    .unwrap();
    app
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
async fn submitted_comments_come_back_threaded() {
    let mut app = signed_in("alice", "swordfish").await;
    let post = app.create_post(post_body("hello"), None).await.unwrap();

    let top = app.submit_comment(post.id, "first!", None).await.unwrap();
    let reply = app
        .submit_comment(post.id, "replying", Some(top.id))
        .await
        .unwrap();
    app.submit_comment(post.id, "deeper", Some(reply.id))
        .await
        .unwrap();
    app.submit_comment(post.id, "another thread", None)
        .await
        .unwrap();

    let tree = app.comment_tree(post.id).await.unwrap();
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.roots.len(), 2);
    assert_eq!(tree.roots[0].comment.content, "first!");
    assert_eq!(tree.roots[0].children.len(), 1);
    assert_eq!(tree.roots[0].children[0].comment.id, reply.id);
    assert_eq!(tree.roots[0].children[0].children[0].comment.content, "deeper");
    assert_eq!(tree.roots[1].comment.content, "another thread");

    // authorship is snapshotted from the session
    assert_eq!(tree.roots[0].comment.author_name, "alice");
    assert_eq!(
        tree.roots[0].comment.author_id,
        app.session().unwrap().user_id()
    );
}

#[tokio::test]
async fn comment_submission_requires_a_session() {
    let mut app = App::new(server_with_users());
    assert_eq!(
        app.submit_comment(PostId(1), "hello", None).await,
        Err(Error::NotLoggedIn)
    );

    let mut app = signed_in("alice", "swordfish").await;
    let post = app.create_post(post_body("hello"), None).await.unwrap();
    app.sign_out().await.unwrap();
    assert_eq!(
        app.submit_comment(post.id, "hello", None).await,
        Err(Error::NotLoggedIn)
    );
}

#[tokio::test]
async fn whitespace_only_comments_are_refused() {
    let mut app = signed_in("alice", "swordfish").await;
    let post = app.create_post(post_body("hello"), None).await.unwrap();
    assert_eq!(
        app.submit_comment(post.id, "   \n ", None).await,
        Err(Error::EmptyText)
    );
    assert_eq!(app.comment_count(post.id).await.unwrap(), 0);
}

#[tokio::test]
async fn a_reply_to_a_vanished_parent_stays_visible() {
    let mut app = signed_in("alice", "swordfish").await;
    let post = app.create_post(post_body("hello"), None).await.unwrap();
    app.submit_comment(post.id, "orphaned", Some(CommentId(999)))
        .await
        .unwrap();
    let tree = app.comment_tree(post.id).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.roots[0].comment.content, "orphaned");
}

#[tokio::test]
async fn comment_fetches_are_cached_until_a_submission() {
    let mut app = signed_in("alice", "swordfish").await;
    let post = app.create_post(post_body("hello"), None).await.unwrap();
    app.submit_comment(post.id, "one", None).await.unwrap();

    let first = app.comments(post.id).await.unwrap();
    let second = app.comments(post.id).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    app.submit_comment(post.id, "two", None).await.unwrap();
    let third = app.comments(post.id).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.len(), 2);
    // the refetched collection is chronological
    assert_eq!(third[0].content, "one");
    assert_eq!(third[1].content, "two");
}

#[tokio::test]
async fn vote_toggle_via_the_app() {
    let mut app = signed_in("alice", "swordfish").await;
    let post = app.create_post(post_body("hello"), None).await.unwrap();

    assert_eq!(
        app.vote(post.id, VoteValue::Up).await.unwrap(),
        VoteOutcome::Inserted
    );
    let tally = app.vote_tally(post.id).await.unwrap();
    assert_eq!((tally.likes, tally.dislikes), (1, 0));
    assert_eq!(tally.own_vote, Some(VoteValue::Up));

    assert_eq!(
        app.vote(post.id, VoteValue::Down).await.unwrap(),
        VoteOutcome::Updated
    );
    let tally = app.vote_tally(post.id).await.unwrap();
    assert_eq!((tally.likes, tally.dislikes), (0, 1));

    assert_eq!(
        app.vote(post.id, VoteValue::Down).await.unwrap(),
        VoteOutcome::Removed
    );
    let tally = app.vote_tally(post.id).await.unwrap();
    assert_eq!(tally, agora_client::VoteTally::default());
    assert_eq!(app.vote_count(post.id).await.unwrap(), 0);
}

#[tokio::test]
async fn voting_requires_a_session() {
    let mut app = App::new(server_with_users());
    assert_eq!(
        app.vote(PostId(1), VoteValue::Up).await,
        Err(Error::NotLoggedIn)
    );
}

#[tokio::test]
async fn posts_and_communities_flow() {
    let mut app = signed_in("alice", "swordfish").await;

    let rust = app
        .create_community(NewCommunity {
            name: String::from("rust"),
            description: Some(String::from("the rust community")),
        })
        .await
        .unwrap();
    app.create_community(NewCommunity {
        name: String::from("cooking"),
        description: None,
    })
    .await
    .unwrap();
    assert_eq!(
        app.create_community(NewCommunity {
            name: String::from("rust"),
            description: None,
        })
        .await,
        Err(Error::NameAlreadyUsed(String::from("rust")))
    );

    // ascending creation order
    let communities = app.communities().await.unwrap();
    assert_eq!(communities.len(), 2);
    assert_eq!(communities[0].name, "rust");
    assert_eq!(communities[1].name, "cooking");

    let mut in_rust = post_body("older");
    in_rust.community_id = Some(rust.id);
    let older = app.create_post(in_rust.clone(), None).await.unwrap();
    in_rust.title = String::from("newer");
    let newer = app.create_post(in_rust, None).await.unwrap();
    app.create_post(post_body("homeless post"), None)
        .await
        .unwrap();

    // newest first, everywhere
    let all = app.posts().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].title, "homeless post");
    let in_community = app.community_posts(rust.id).await.unwrap();
    assert_eq!(
        in_community.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );

    let fetched = app.post(older.id).await.unwrap();
    assert_eq!(fetched.title, "older");
    assert_eq!(fetched.community_id, Some(rust.id));

    assert_eq!(
        app.post(PostId(999)).await,
        Err(Error::UnknownPost(PostId(999)))
    );
    assert_eq!(
        app.community_posts(agora_client::api::CommunityId(999)).await,
        Err(Error::UnknownCommunity(agora_client::api::CommunityId(999)))
    );
}

#[tokio::test]
async fn per_post_counts_track_inserts() {
    let mut app = signed_in("bob", "hunter2").await;
    let post = app.create_post(post_body("counted"), None).await.unwrap();
    app.submit_comment(post.id, "a", None).await.unwrap();
    app.submit_comment(post.id, "b", None).await.unwrap();
    app.vote(post.id, VoteValue::Up).await.unwrap();
    assert_eq!(app.comment_count(post.id).await.unwrap(), 2);
    assert_eq!(app.vote_count(post.id).await.unwrap(), 1);
}

#[tokio::test]
async fn bad_credentials_are_refused() {
    let mut app = App::new(server_with_users());
    assert_eq!(
        app.sign_in(NewSession::new(
            String::from("alice"),
            String::from("wrong"),
            String::from("integration-tests"),
        ))
        .await,
        Err(Error::PermissionDenied)
    );
    assert!(app.session().is_none());
}
