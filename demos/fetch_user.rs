//! Fetch User
//!
//! This demo generates a store for a small user resource and walks one
//! operation through success and another through failure.
//!
//! Key concepts:
//! - Declaring operations with the fluent builder
//! - Custom success folding
//! - Observing pending and error slots around a dispatch
//!
//! Run with: cargo run --example fetch_user

use resource_store::core::{RequestError, Response};
use resource_store::descriptor::{OperationSpec, ResourceDescriptor};
use resource_store::generate::assemble;
use resource_store::store::Store;
use serde_json::json;

fn user_resource() -> Result<ResourceDescriptor, Box<dyn std::error::Error>> {
    let fetch_user = OperationSpec::builder()
        .property("user")
        .commit("FETCH_USER")
        .dispatch("fetchUser")
        .request_async(|params, _| async move {
            Ok(Response::new(json!({ "id": params["id"], "name": "Ada" }))
                .with_field("status", json!(200)))
        })
        .build()?;

    let list_posts = OperationSpec::builder()
        .property("posts")
        .commit("LIST_POSTS")
        .dispatch("listPosts")
        .request_async(|_, _| async { Ok(Response::new(json!([{ "id": 1 }, { "id": 2 }]))) })
        .on_success(|state, response, _| {
            let count = response.data.as_array().map_or(0, Vec::len);
            state.set("posts", response.data.clone());
            state.set("postCount", json!(count));
        })
        .build()?;

    let delete_user = OperationSpec::builder()
        .property("deleted")
        .commit("DELETE_USER")
        .dispatch("deleteUser")
        .request_async(|_, _| async { Err(RequestError::new(json!({ "status": 403 }))) })
        .build()?;

    Ok(ResourceDescriptor::new()
        .base_field("postCount", json!(0))
        .operation("fetchUser", fetch_user)
        .operation("listPosts", list_posts)
        .operation("deleteUser", delete_user))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fetch User Example ===\n");

    let store = Store::new(assemble(&user_resource()?)?);
    println!("Initial state:\n  {}\n", store.state().to_value());

    let params = serde_json::from_value(json!({ "params": { "id": 42 } }))?;
    let user = store.dispatch("fetchUser", Some(params)).await?;
    println!(
        "fetchUser resolved with {} (status {})",
        user.data,
        user.field("status").unwrap_or(&json!(null))
    );

    store.dispatch("listPosts", None).await?;
    println!("listPosts stored {} posts", store.state().get("postCount").unwrap_or(&json!(0)));

    match store.dispatch("deleteUser", None).await {
        Ok(_) => println!("deleteUser unexpectedly succeeded"),
        Err(error) => println!("deleteUser rejected: {error}"),
    }

    println!("\nFinal state:\n  {}\n", store.state().to_value());

    println!("Commit history:");
    for record in store.history().records() {
        println!("  {} at {}", record.key, record.timestamp);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
