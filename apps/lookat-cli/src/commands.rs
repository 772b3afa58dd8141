use anyhow::{Context, bail};
use uuid::Uuid;

use lookat_core::domain::Post;
use lookat_shared::{NewPostRequest, PostResponse};

use crate::cli::*;
use crate::state::AppState;
use crate::view_model::{FeedFilter, FeedViewModel};

pub async fn run_command(cli: Cli, state: &AppState) -> anyhow::Result<()> {
    let format = cli.format;
    if !state.persistent && !matches!(cli.command, Command::Demo) {
        tracing::warn!("Documents are kept in memory and will not outlive this command");
    }

    match cli.command {
        Command::List(args) => cmd_list(state, args, format).await,
        Command::Post(args) => cmd_post(state, args, format).await,
        Command::Delete(args) => cmd_delete(state, args.id).await,
        Command::Like(args) => cmd_set_favorite(state, args.id, true).await,
        Command::Unlike(args) => cmd_set_favorite(state, args.id, false).await,
        Command::Demo => cmd_demo(state, format).await,
    }
}

async fn cmd_list(state: &AppState, args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let filter = if args.mine {
        FeedFilter::Author(state.repository.user().clone())
    } else if args.liked {
        FeedFilter::Liked
    } else {
        FeedFilter::All
    };

    let feed = load_feed(state, filter).await?;
    let posts = feed.search(args.search.as_deref().unwrap_or(""));
    print_posts(&posts, format)
}

async fn cmd_post(state: &AppState, args: PostArgs, format: OutputFormat) -> anyhow::Result<()> {
    let request = NewPostRequest {
        title: args.title,
        content: args.content,
        image_path: args.image,
    };
    let image_url = request.image_url()?;

    let mut post = Post::new(request.title, request.content, state.repository.user().clone());
    if let Some(url) = image_url {
        post = post.with_image(url);
    }

    let created = state
        .repository
        .create(post)
        .await
        .context("Cannot create post")?;
    print_posts(&[&created], format)
}

async fn cmd_delete(state: &AppState, id: Uuid) -> anyhow::Result<()> {
    let mut feed = load_feed(state, FeedFilter::All).await?;
    let post = find_post(&feed, id)?;
    if !feed.can_delete(&post) {
        bail!("Post {id} belongs to {} and cannot be deleted by you", post.author.name);
    }

    feed.delete(&post).await.context("Cannot delete post")?;
    println!("Deleted {id}");
    Ok(())
}

async fn cmd_set_favorite(state: &AppState, id: Uuid, favorite: bool) -> anyhow::Result<()> {
    let mut feed = load_feed(state, FeedFilter::All).await?;
    let post = find_post(&feed, id)?;

    if post.is_favorite != favorite {
        feed.toggle_favorite(&post).await.context("Cannot update like")?;
    }
    println!("{} {id}", if favorite { "Liked" } else { "Unliked" });
    Ok(())
}

async fn cmd_demo(state: &AppState, format: OutputFormat) -> anyhow::Result<()> {
    let me = state.repository.user().clone();
    let mut feed = load_feed(state, FeedFilter::All).await?;

    let apple = feed
        .create(Post::new("Look@", "What goes up must come down", me.clone()))
        .await?;
    let opticks = feed
        .create(Post::new("Opticks", "White light is a mixture of colours", me))
        .await?;
    println!("Created {} and {}", apple.id, opticks.id);

    feed.toggle_favorite(&opticks).await?;
    println!("\nFeed:");
    print_posts(&feed.search(""), format)?;

    let liked = load_feed(state, FeedFilter::Liked).await?;
    println!("\nLiked:");
    print_posts(&liked.search(""), format)?;

    println!("\nSearch \"newton\" / \"gravity\": {} / {}", feed.search("newton").len(), feed.search("gravity").len());

    let opticks = find_post(&feed, opticks.id)?;
    feed.toggle_favorite(&opticks).await?;
    feed.delete(&opticks).await?;
    feed.delete(&apple).await?;
    println!("\nCleaned up demo posts");
    Ok(())
}

async fn load_feed(state: &AppState, filter: FeedFilter) -> anyhow::Result<FeedViewModel> {
    let mut feed = FeedViewModel::new(state.repository.clone(), filter);
    feed.fetch_posts().await;
    if let Some(cause) = feed.posts().failure() {
        bail!("Cannot fetch posts: {cause}");
    }
    Ok(feed)
}

fn find_post(feed: &FeedViewModel, id: Uuid) -> anyhow::Result<Post> {
    feed.find(id)
        .cloned()
        .with_context(|| format!("No post with id {id}"))
}

fn print_posts(posts: &[&Post], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let responses: Vec<PostResponse> = posts.iter().map(|post| to_response(post)).collect();
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
        OutputFormat::Text => {
            if posts.is_empty() {
                println!("No posts.");
            }
            for post in posts {
                let marker = if post.is_favorite { "♥" } else { " " };
                println!("{marker} {}  {}", post.id, post.title);
                println!(
                    "    by {} at {}",
                    post.author.name,
                    post.timestamp.format("%Y-%m-%d %H:%M")
                );
                println!("    {}", post.content);
                if let Some(url) = &post.image_url {
                    println!("    image: {url}");
                }
            }
        }
    }
    Ok(())
}

fn to_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        content: post.content.clone(),
        author_id: post.author.id.to_string(),
        author_name: post.author.name.clone(),
        image_url: post.image_url.as_ref().map(ToString::to_string),
        timestamp: post.timestamp.to_rfc3339(),
        is_favorite: post.is_favorite,
    }
}
