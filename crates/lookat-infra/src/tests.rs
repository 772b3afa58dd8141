//! Repository behaviour over the in-memory backends.

use std::io::Write;
use std::sync::Arc;

use url::Url;

use lookat_core::StorePostsRepository;
use lookat_core::domain::{Post, User};
use lookat_core::fixtures;
use lookat_core::ports::PostsRepository;

use crate::{InMemoryAttachmentStore, InMemoryDocumentStore};

fn repository(
    user: User,
    store: Arc<InMemoryDocumentStore>,
    attachments: Arc<InMemoryAttachmentStore>,
) -> StorePostsRepository {
    StorePostsRepository::new(user, store, attachments)
}

#[tokio::test]
async fn test_create_with_local_image_then_fetch() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let attachments = Arc::new(InMemoryAttachmentStore::new());
    let repo = repository(fixtures::test_user(), store.clone(), attachments.clone());

    let mut image = tempfile::NamedTempFile::new().unwrap();
    image.write_all(b"jpeg bytes").unwrap();
    let post = fixtures::test_post().with_image(Url::from_file_path(image.path()).unwrap());

    let created = repo.create(post.clone()).await.unwrap();
    let url = created.image_url.clone().unwrap();
    assert_ne!(url.scheme(), "file");
    assert_eq!(attachments.get(&url).await, Some(b"jpeg bytes".to_vec()));

    let posts = repo.fetch_all_posts().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, post.id);
    assert_eq!(posts[0].image_url, Some(url));
    assert!(!posts[0].is_favorite);

    let stored = store.get("posts", &post.id.to_string()).await.unwrap();
    assert!(stored.get("isFavorite").is_none());
}

#[tokio::test]
async fn test_two_users_share_posts_but_not_likes() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let attachments = Arc::new(InMemoryAttachmentStore::new());
    let newton = repository(fixtures::test_user(), store.clone(), attachments.clone());
    let hooke = repository(User::new("hooke", "Robert Hooke"), store.clone(), attachments);

    let post = newton
        .create(Post::new("Micrographia", "Look closer", hooke.user().clone()))
        .await
        .unwrap();

    hooke.like(&post).await.unwrap();
    hooke.like(&post).await.unwrap();
    assert_eq!(store.count("likes").await, 1);

    assert!(hooke.fetch_liked_posts().await.unwrap()[0].is_favorite);
    assert!(newton.fetch_liked_posts().await.unwrap().is_empty());
    assert!(!newton.fetch_all_posts().await.unwrap()[0].is_favorite);

    // Newton created it, but Hooke is the author
    assert!(!newton.can_delete(&post));
    assert!(newton.delete(&post).await.is_err());
    assert_eq!(store.count("posts").await, 1);

    hooke.delete(&post).await.unwrap();
    assert!(hooke.fetch_posts_by_author(hooke.user()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_removes_uploaded_attachment() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let attachments = Arc::new(InMemoryAttachmentStore::new());
    let repo = repository(fixtures::test_user(), store, attachments.clone());

    let mut image = tempfile::NamedTempFile::new().unwrap();
    image.write_all(b"png").unwrap();
    let created = repo
        .create(fixtures::test_post().with_image(Url::from_file_path(image.path()).unwrap()))
        .await
        .unwrap();
    assert_eq!(attachments.count().await, 1);

    repo.delete(&created).await.unwrap();
    assert_eq!(attachments.count().await, 0);
}
