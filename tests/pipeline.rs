use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use talon_resource::resource::{hooks, naming};
use talon_resource::{
    load_record, run_pipeline, Action, AppError, ConcernConfig, ConfigError, FieldType, Listing, MemoryRepository,
    PageKind, Params, PreloadTarget, Query, Record, Resource, ResourceConfig, ResourceDescriptor,
    ResourceRegistry, SchemaDef, SchemaRef, StaticConcerns,
};

fn author() -> SchemaRef {
    SchemaDef::new("MyBlog.Author")
        .field("id", FieldType::Integer)
        .field("email", FieldType::String)
        .field("name", FieldType::String)
        .has_many("posts", "BlogPost", "author_id")
        .into_ref()
}

fn blog_post() -> SchemaRef {
    SchemaDef::new("MyBlog.BlogPost")
        .field("id", FieldType::Integer)
        .field("title", FieldType::String)
        .field("body", FieldType::String)
        .field("inserted_at", FieldType::DateTime)
        .field("updated_at", FieldType::DateTime)
        .into_ref()
}

fn repo() -> MemoryRepository {
    MemoryRepository::new()
        .with_rows(
            author(),
            vec![json!({"id": 1, "email": "ada@example.com", "name": "Ada"})],
        )
        .with_rows(
            blog_post(),
            (1..=25)
                .map(|i| {
                    json!({
                        "id": i,
                        "title": format!("Post {:02}", i),
                        "body": if i % 5 == 0 { "about rust" } else { "about other things" },
                        "author_id": 1,
                    })
                })
                .collect(),
        )
}

fn my_blog(paginate: Option<bool>) -> StaticConcerns {
    StaticConcerns::new()
        .with_concern(ConcernConfig {
            name: "MyBlog".into(),
            adapter: Some("ecto_adapter".into()),
            paginate,
            theme: None,
        })
        .with_repository("MyBlog", Arc::new(repo()))
}

fn posts(paginate: Option<bool>) -> ResourceDescriptor {
    let config = ResourceConfig::new().schema(blog_post()).concern("MyBlog");
    ResourceDescriptor::resolve(config, &my_blog(paginate)).unwrap()
}

#[test]
fn resolves_blog_post_end_to_end() {
    let d = posts(None);
    assert_eq!(d.params_key(), "blog_post");
    assert_eq!(d.route_name(), "blog_posts");
    assert_eq!(d.adapter(), "ecto_adapter");
    assert!(d.paginate());
    assert_eq!(d.domain(), "talon");
    assert_eq!(d.display_columns(PageKind::Index), vec!["title", "body"]);
    assert_eq!(d.name_field().as_deref(), Some("title"));
    assert_eq!(d.display_name(), "Blog Post");
    assert_eq!(d.display_name_plural(), "Blog Posts");
}

#[test]
fn params_key_is_deterministic() {
    let a = posts(None);
    let b = posts(Some(false));
    assert_eq!(a.params_key(), b.params_key());
    assert_eq!(a.route_name(), talon_resource::case::pluralize(a.params_key()));
}

#[test]
fn missing_schema_and_adapter_fail_registration() {
    let err = ResourceDescriptor::resolve(ResourceConfig::new().concern("MyBlog"), &my_blog(None)).unwrap_err();
    assert_eq!(err.to_string(), "schema is required");

    let bare = StaticConcerns::new().with_repository("Bare", Arc::new(repo()));
    let config = ResourceConfig::new().schema(blog_post()).concern("Bare");
    let err = ResourceDescriptor::resolve(config, &bare).unwrap_err();
    assert!(matches!(err, ConfigError::AdapterRequired));
    assert_eq!(err.to_string(), "schema_adapter required");
}

#[tokio::test]
async fn index_pipeline_returns_a_page() {
    let d = posts(None);
    let params = Params::new()
        .with("order", json!("-id"))
        .with("page", json!("2"))
        .with("page_size", json!("10"));
    let listing = run_pipeline(&d, Query::from_schema(d.schema().clone()), &params, &Action::Index)
        .await
        .unwrap();
    let Listing::Page(page) = listing else {
        panic!("expected a page");
    };
    assert_eq!(page.page_number, 2);
    assert_eq!(page.total_entries, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.entries.first().and_then(|r| r.get("id")), Some(&json!(15)));
}

#[tokio::test]
async fn unpaginated_resource_returns_all_rows() {
    let d = posts(Some(false));
    let listing = run_pipeline(&d, Query::from_schema(d.schema().clone()), &Params::new(), &Action::Index)
        .await
        .unwrap();
    assert!(matches!(&listing, Listing::Resources(rows) if rows.len() == 25));
    let json = serde_json::to_value(&listing).unwrap();
    assert!(json.get("resources").is_some());
}

#[tokio::test]
async fn search_pipeline_filters_by_terms() {
    let d = posts(None);
    let params = Params::new().with("search_terms", json!("RUST"));
    let listing = run_pipeline(&d, Query::from_schema(d.schema().clone()), &params, &Action::Search)
        .await
        .unwrap();
    assert_eq!(listing.records().len(), 5);
}

#[tokio::test]
async fn id_filter_wins_over_order() {
    let d = posts(None);
    let params = Params::new().with("id", json!("5")).with("order", json!("-title"));
    let listing = run_pipeline(&d, Query::from_schema(d.schema().clone()), &params, &Action::Index)
        .await
        .unwrap();
    let ids: Vec<_> = listing.records().iter().filter_map(|r| r.get("id").cloned()).collect();
    assert_eq!(ids, vec![json!(5)]);
}

#[tokio::test]
async fn load_record_preloads_associations() {
    let config = ResourceConfig::new().schema(author()).concern("MyBlog");
    let d = ResourceDescriptor::resolve(config, &my_blog(None)).unwrap();
    let params = Params::new().with("id", json!(1));

    let shown = load_record(&d, &params, &Action::Show).await.unwrap();
    assert_eq!(shown.get("posts").and_then(|v| v.as_array()).map(Vec::len), Some(25));
    assert_eq!(d.name_field().as_deref(), Some("name"));
    assert_eq!(d.header_title(&Action::Show, Some(&shown)), "Author Ada");

    let exported = load_record(&d, &params, &Action::Other("export".into())).await.unwrap();
    assert!(exported.get("posts").is_some());

    let missing = load_record(&d, &Params::new().with("id", json!(99)), &Action::Show).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

/// Posts resource that shows the id first, lists newest first and only searches published posts.
struct Posts(ResourceDescriptor);

#[async_trait]
impl Resource for Posts {
    fn descriptor(&self) -> &ResourceDescriptor {
        &self.0
    }

    fn display_columns(&self, kind: PageKind) -> Vec<String> {
        let mut columns = naming::display_columns(self.0.schema().as_ref(), kind);
        if kind == PageKind::Index {
            columns.insert(0, "id".into());
        }
        columns
    }

    fn query(&self, query: Query, params: &Params, action: &Action) -> Query {
        let query = hooks::query(&self.0, query, params, action);
        if query.order.is_empty() {
            query.order_by(vec![talon_resource::query::OrderBy::desc("id")])
        } else {
            query
        }
    }

    async fn preload(&self, target: PreloadTarget, params: &Params, action: &Action) -> Result<PreloadTarget, AppError> {
        hooks::preload(&self.0, target, params, action).await
    }
}

#[tokio::test]
async fn overrides_compose_with_defaults() {
    let resource = Posts(posts(Some(false)));
    assert_eq!(resource.display_columns(PageKind::Index), vec!["id", "title", "body"]);
    assert_eq!(resource.display_columns(PageKind::Form), vec!["title", "body"]);

    let listing = run_pipeline(&resource, Query::from_schema(blog_post()), &Params::new(), &Action::Index)
        .await
        .unwrap();
    assert_eq!(listing.records().first().and_then(|r| r.get("id")), Some(&json!(25)));

    let mut registry = ResourceRegistry::new();
    registry.register(Arc::new(resource)).unwrap();
    let meta = registry.meta("blog_posts").unwrap();
    assert_eq!(meta.columns["index"][0].label, "Id");
    assert_eq!(meta.toolbar_title, "Blog Post listing");
}

#[test]
fn record_title_uses_name_field() {
    let record = Record::from_value(blog_post(), json!({"id": 3, "title": "Hello"}));
    let d = posts(None);
    assert_eq!(d.resource_title(&record), "Hello");
    assert_eq!(d.header_title(&Action::Edit, Some(&record)), "Edit Hello");
    assert_eq!(d.header_title(&Action::Index, None), "Blog Posts");
}

/// Posts named by their body rather than the inferred title field.
struct PostsByBody(ResourceDescriptor);

impl Resource for PostsByBody {
    fn descriptor(&self) -> &ResourceDescriptor {
        &self.0
    }

    fn name_field(&self) -> Option<String> {
        Some("body".into())
    }
}

#[test]
fn name_field_override_drives_titles_and_meta() {
    let resource = PostsByBody(posts(None));
    let record = Record::from_value(blog_post(), json!({"id": 3, "title": "Hello", "body": "about rust"}));
    assert_eq!(resource.resource_title(&record), "about rust");
    assert_eq!(resource.header_title(&Action::Show, Some(&record)), "Blog Post about rust");
    assert_eq!(resource.header_title(&Action::Edit, Some(&record)), "Edit about rust");

    let mut registry = ResourceRegistry::new();
    registry.register(Arc::new(resource)).unwrap();
    let meta = registry.meta("blog_posts").unwrap();
    assert_eq!(meta.name_field.as_deref(), Some("body"));
}
