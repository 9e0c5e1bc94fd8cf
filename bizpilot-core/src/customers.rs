//! Customer directory.
//!
//! Name/email/address records keyed by tenant. The first listing for a
//! tenant with an empty directory seeds a fixed demo set so a fresh
//! account has something to invoice against; the seed runs once, never as
//! a recurring side effect.

use axum::extract::State;
use axum::response::Json;
use sqlx::PgPool;
use tracing::info;

use crate::auth::CurrentTenant;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateCustomer, Customer};
use crate::AppState;

/// Demo customers seeded into an empty directory on first listing.
const DEMO_CUSTOMERS: [(&str, &str, &str); 4] = [
    ("Amit Patel", "amit@example.com", "123 Tech Park, Bangalore"),
    ("Sunita Reddy", "sunita@example.com", "456 IT Hub, Hyderabad"),
    ("Vikram Singh", "vikram@example.com", "789 Business Bay, Mumbai"),
    ("Priya Sharma", "priya@example.com", "101 Cyber City, Gurgaon"),
];

/// Lists a tenant's customers ordered by name, seeding the demo set when
/// the directory is empty.
pub async fn list_customers(pool: &PgPool, tenant_id: &str) -> ApiResult<Vec<Customer>> {
    let mut tx = pool.begin().await?;

    let mut customers: Vec<Customer> = sqlx::query_as(
        r#"
        SELECT id, tenant_id, name, email, address, created_at
        FROM customers
        WHERE tenant_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(&mut *tx)
    .await?;

    if customers.is_empty() {
        info!("Seeding demo customers for tenant {}", tenant_id);

        for (name, email, address) in DEMO_CUSTOMERS {
            sqlx::query(
                r#"
                INSERT INTO customers (tenant_id, name, email, address)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(tenant_id)
            .bind(name)
            .bind(email)
            .bind(address)
            .execute(&mut *tx)
            .await?;
        }

        customers = sqlx::query_as(
            r#"
            SELECT id, tenant_id, name, email, address, created_at
            FROM customers
            WHERE tenant_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(customers)
}

/// Creates a customer for a tenant.
pub async fn create_customer(
    pool: &PgPool,
    tenant_id: &str,
    req: CreateCustomer,
) -> ApiResult<Customer> {
    if req.name.trim().is_empty() {
        return Err(ApiError::missing_fields(&["name"]));
    }

    let customer: Customer = sqlx::query_as(
        r#"
        INSERT INTO customers (tenant_id, name, email, address)
        VALUES ($1, $2, $3, $4)
        RETURNING id, tenant_id, name, email, address, created_at
        "#,
    )
    .bind(tenant_id)
    .bind(req.name.trim())
    .bind(&req.email)
    .bind(&req.address)
    .fetch_one(pool)
    .await?;

    Ok(customer)
}

/// `GET /customers` handler.
pub async fn list_customers_handler(
    State(state): State<AppState>,
    CurrentTenant(tenant_id): CurrentTenant,
) -> ApiResult<Json<Vec<Customer>>> {
    let customers = list_customers(&state.db, &tenant_id).await?;
    Ok(Json(customers))
}

/// `POST /customers` handler.
pub async fn create_customer_handler(
    State(state): State<AppState>,
    CurrentTenant(tenant_id): CurrentTenant,
    Json(req): Json<CreateCustomer>,
) -> ApiResult<Json<Customer>> {
    let customer = create_customer(&state.db, &tenant_id, req).await?;
    Ok(Json(customer))
}
