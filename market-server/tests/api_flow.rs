//! End-to-end API tests against an in-memory database.
//!
//! Each test builds the full router (auth middleware, role guards, handlers)
//! and drives it with `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use market_server::auth::UserRole;
use market_server::db::DbService;
use market_server::{Config, ErrorCode, Server, ServerState};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const ADMIN: &str = "admin-1";

struct TestApp {
    router: Router,
    state: ServerState,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_tests(dir.path().to_string_lossy().to_string());
        let db = DbService::memory().await.unwrap();
        let state = ServerState::new(config, db.pool);
        let router = Server::build_router(state.clone());
        Self {
            router,
            state,
            _dir: dir,
        }
    }

    fn token(&self, user_id: &str, role: UserRole) -> String {
        self.state
            .jwt_service
            .generate_token(user_id, None, role, chrono::Duration::hours(1))
            .unwrap()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<(&str, UserRole)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((user, role)) = auth {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user, role)));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let resp = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str, auth: (&str, UserRole)) -> (StatusCode, Value) {
        self.send("GET", uri, Some(auth), None).await
    }

    async fn post(&self, uri: &str, auth: (&str, UserRole), body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(auth), Some(body)).await
    }

    /// Register a company for `owner` and approve it
    async fn approved_company(&self, owner: &str, nif: &str, city: &str) -> i64 {
        let (status, company) = self
            .post(
                "/api/companies",
                (owner, UserRole::Company),
                json!({
                    "name": format!("Kitchen {owner}"),
                    "nif": nif,
                    "email": format!("{owner}@example.com"),
                    "phone": "+244900000000",
                    "address": "Rua 1",
                    "country": "AO",
                    "city": city,
                    "plan": "basic",
                    "delivery_types": ["platform_delivery", "self_delivery", "pickup"],
                    "delivery_fee": 500.0
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{company}");
        assert_eq!(company["status"], "pending");
        let id = company["id"].as_i64().unwrap();

        let (status, approved) = self
            .post(&format!("/api/companies/{id}/approve"), (ADMIN, UserRole::Admin), json!({}))
            .await;
        assert_eq!(status, StatusCode::OK, "{approved}");
        assert_eq!(approved["status"], "approved");
        id
    }

    async fn create_coupon(&self, body: Value) -> i64 {
        let (status, coupon) = self.post("/api/coupons", (ADMIN, UserRole::Admin), body).await;
        assert_eq!(status, StatusCode::OK, "{coupon}");
        coupon["id"].as_i64().unwrap()
    }

    async fn place_order(&self, customer: &str, body: Value) -> (StatusCode, Value) {
        self.post("/api/orders", (customer, UserRole::Customer), body).await
    }
}

fn error_code(body: &Value) -> u16 {
    body["code"].as_u64().unwrap_or_default() as u16
}

fn order_body(company_id: i64, delivery_type: &str, items: Value) -> Value {
    json!({
        "company_id": company_id,
        "delivery_type": delivery_type,
        "items": items,
        "delivery_address": "Avenida 4 de Fevereiro, 10"
    })
}

fn future_slot(max_orders: i64) -> Value {
    let start = shared::util::now_millis() + 60 * 60 * 1000;
    json!({
        "starts_at": start,
        "ends_at": start + 30 * 60 * 1000,
        "max_orders": max_orders
    })
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), ErrorCode::NotAuthenticated.code());

    let (status, _) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_guards() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/coupons", ("cust-1", UserRole::Customer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), ErrorCode::AdminRequired.code());

    let (status, body) = app
        .post(
            "/api/orders",
            ("owner-1", UserRole::Company),
            order_body(1, "pickup", json!([])),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), ErrorCode::RoleRequired.code());
}

#[tokio::test]
async fn test_order_economics_with_percentage_coupon() {
    let app = TestApp::new().await;
    let company_id = app.approved_company("owner-1", "NIF-1", "Luanda").await;
    let coupon_id = app
        .create_coupon(json!({
            "code": "save10",
            "coupon_type": "percentage",
            "value": 10.0,
            "max_uses": 5
        }))
        .await;

    let mut body = order_body(
        company_id,
        "platform_delivery",
        json!([
            { "product_name": "Pizza", "unit_price": 2500.0, "quantity": 2 },
            { "product_name": "Soda", "unit_price": 500.0, "quantity": 1 }
        ]),
    );
    body["coupon_code"] = json!("SAVE10");

    let (status, order) = app.place_order("cust-1", body).await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["subtotal"].as_f64(), Some(5500.0));
    assert_eq!(order["delivery_fee"].as_f64(), Some(500.0));
    assert_eq!(order["discount_amount"].as_f64(), Some(550.0));
    assert_eq!(order["total"].as_f64(), Some(5450.0));
    assert_eq!(order["commission_rate"].as_f64(), Some(15.0));
    assert_eq!(order["commission_amount"].as_f64(), Some(825.0));
    assert_eq!(order["commission_source"], "plan_default");
    assert_eq!(order["coupon_code"], "SAVE10");
    assert_eq!(order["items"].as_array().map(Vec::len), Some(2));

    let (_, coupon) = app
        .get(&format!("/api/coupons/{coupon_id}"), (ADMIN, UserRole::Admin))
        .await;
    assert_eq!(coupon["used_count"].as_i64(), Some(1));

    // approval notice + new order
    let (_, unread) = app
        .get("/api/notifications/unread-count", ("owner-1", UserRole::Company))
        .await;
    assert_eq!(unread["data"]["unread"].as_i64(), Some(2));
}

#[tokio::test]
async fn test_free_shipping_and_pickup_fees() {
    let app = TestApp::new().await;
    let company_id = app.approved_company("owner-1", "NIF-1", "Luanda").await;
    app.create_coupon(json!({ "code": "FREESHIP", "coupon_type": "free_shipping", "value": 0.0 }))
        .await;

    let items = json!([{ "product_name": "Burger", "unit_price": 1200.0, "quantity": 1 }]);

    let mut body = order_body(company_id, "self_delivery", items.clone());
    body["coupon_code"] = json!("freeship");
    let (status, order) = app.place_order("cust-1", body).await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["delivery_fee"].as_f64(), Some(0.0));
    assert_eq!(order["discount_amount"].as_f64(), Some(0.0));
    assert_eq!(order["total"].as_f64(), Some(1200.0));
    assert_eq!(order["commission_rate"].as_f64(), Some(8.0));
    assert_eq!(order["commission_amount"].as_f64(), Some(96.0));

    let (status, order) = app
        .place_order("cust-1", order_body(company_id, "pickup", items))
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["delivery_fee"].as_f64(), Some(0.0));
    assert_eq!(order["commission_amount"].as_f64(), Some(60.0));
}

#[tokio::test]
async fn test_coupon_minimum_and_exhaustion() {
    let app = TestApp::new().await;
    let company_id = app.approved_company("owner-1", "NIF-1", "Luanda").await;
    app.create_coupon(json!({
        "code": "ONCE",
        "coupon_type": "fixed",
        "value": 100.0,
        "min_order_value": 500.0,
        "max_uses": 1
    }))
    .await;

    let (status, body) = app
        .post(
            "/api/coupons/validate",
            ("cust-1", UserRole::Customer),
            json!({ "code": "once", "subtotal": 300.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), ErrorCode::CouponMinimumNotMet.code());

    let (status, quote) = app
        .post(
            "/api/coupons/validate",
            ("cust-1", UserRole::Customer),
            json!({ "code": "once", "subtotal": 800.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["discount_amount"].as_f64(), Some(100.0));

    let items = json!([{ "product_name": "Menu", "unit_price": 800.0, "quantity": 1 }]);
    let mut body = order_body(company_id, "pickup", items);
    body["coupon_code"] = json!("ONCE");

    let (status, order) = app.place_order("cust-1", body.clone()).await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["total"].as_f64(), Some(700.0));

    let (status, err) = app.place_order("cust-2", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&err), ErrorCode::CouponExhausted.code());

    let (_, orders) = app.get("/api/orders", (ADMIN, UserRole::Admin)).await;
    assert_eq!(orders.as_array().map(Vec::len), Some(1));

    let (status, err) = app
        .post(
            "/api/coupons",
            (ADMIN, UserRole::Admin),
            json!({ "code": "once", "coupon_type": "fixed", "value": 5.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&err), ErrorCode::CouponCodeExists.code());
}

#[tokio::test]
async fn test_commission_overrides() {
    let app = TestApp::new().await;
    let luanda = app.approved_company("owner-1", "NIF-1", "Luanda").await;
    let benguela = app.approved_company("owner-2", "NIF-2", "Benguela").await;

    for (city, rate) in [(Value::Null, 12.0), (json!("Luanda"), 10.0)] {
        let (status, cfg) = app
            .post(
                "/api/commission-configs",
                (ADMIN, UserRole::Admin),
                json!({
                    "country": "AO",
                    "city": city,
                    "plan": "basic",
                    "delivery_type": "platform_delivery",
                    "commission_percentage": rate
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{cfg}");
    }

    // second active row for the same key
    let (status, err) = app
        .post(
            "/api/commission-configs",
            (ADMIN, UserRole::Admin),
            json!({
                "country": "AO",
                "city": "Luanda",
                "plan": "basic",
                "delivery_type": "platform_delivery",
                "commission_percentage": 9.0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&err), ErrorCode::CommissionConfigDuplicate.code());

    let (status, err) = app
        .post(
            "/api/commission-configs",
            (ADMIN, UserRole::Admin),
            json!({
                "country": "AO",
                "plan": "premium",
                "delivery_type": "pickup",
                "commission_percentage": 120.0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&err), ErrorCode::InvalidCommissionRate.code());

    let items = json!([{ "product_name": "Combo", "unit_price": 2500.0, "quantity": 1 }]);

    let (_, order) = app
        .place_order("cust-1", order_body(luanda, "platform_delivery", items.clone()))
        .await;
    assert_eq!(order["commission_amount"].as_f64(), Some(250.0));
    assert_eq!(order["commission_source"], "city_override");

    let (_, order) = app
        .place_order("cust-1", order_body(benguela, "platform_delivery", items.clone()))
        .await;
    assert_eq!(order["commission_amount"].as_f64(), Some(300.0));
    assert_eq!(order["commission_source"], "country_override");

    // no override for self delivery: plan default
    let (status, quote) = app
        .post(
            "/api/orders/quote",
            ("cust-1", UserRole::Customer),
            json!({ "company_id": luanda, "delivery_type": "self_delivery", "items": items }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{quote}");
    assert_eq!(quote["commission_amount"].as_f64(), Some(200.0));
    assert_eq!(quote["commission_source"], "plan_default");
}

#[tokio::test]
async fn test_full_slot_rolls_back_coupon() {
    let app = TestApp::new().await;
    let company_id = app.approved_company("owner-1", "NIF-1", "Luanda").await;
    let coupon_id = app
        .create_coupon(json!({ "code": "TENOFF", "coupon_type": "fixed", "value": 10.0 }))
        .await;

    let (status, slot) = app
        .post(
            &format!("/api/companies/{company_id}/slots"),
            ("owner-1", UserRole::Company),
            future_slot(1),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{slot}");
    let slot_id = slot["id"].as_i64().unwrap();

    let items = json!([{ "product_name": "Soup", "unit_price": 900.0, "quantity": 1 }]);

    let mut first = order_body(company_id, "self_delivery", items.clone());
    first["slot_id"] = json!(slot_id);
    let (status, order) = app.place_order("cust-1", first).await;
    assert_eq!(status, StatusCode::OK, "{order}");
    let order_id = order["id"].as_i64().unwrap();

    let mut second = order_body(company_id, "self_delivery", items);
    second["slot_id"] = json!(slot_id);
    second["coupon_code"] = json!("TENOFF");
    let (status, err) = app.place_order("cust-2", second).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&err), ErrorCode::SlotFull.code());

    // the coupon use taken before the slot failed was rolled back
    let (_, coupon) = app
        .get(&format!("/api/coupons/{coupon_id}"), (ADMIN, UserRole::Admin))
        .await;
    assert_eq!(coupon["used_count"].as_i64(), Some(0));

    // full slots are hidden from customers
    let (_, offered) = app
        .get(&format!("/api/companies/{company_id}/slots"), ("cust-2", UserRole::Customer))
        .await;
    assert_eq!(offered.as_array().map(Vec::len), Some(0));

    let (status, cancelled) = app
        .post(
            &format!("/api/orders/{order_id}/cancel"),
            ("cust-1", UserRole::Customer),
            json!({ "reason": "changed my mind" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{cancelled}");
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(cancelled["cancel_reason"], "changed my mind");

    let (_, slots) = app
        .get(
            &format!("/api/companies/{company_id}/slots/all"),
            ("owner-1", UserRole::Company),
        )
        .await;
    assert_eq!(slots[0]["current_orders"].as_i64(), Some(0));

    let (status, err) = app
        .post(
            &format!("/api/orders/{order_id}/cancel"),
            ("cust-1", UserRole::Customer),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&err), ErrorCode::OrderAlreadyCancelled.code());
}

#[tokio::test]
async fn test_unapproved_company_cannot_take_orders() {
    let app = TestApp::new().await;
    let (_, company) = app
        .post(
            "/api/companies",
            ("owner-1", UserRole::Company),
            json!({
                "name": "Pending Kitchen",
                "nif": "NIF-P",
                "email": "p@example.com",
                "phone": "1",
                "address": "Rua 2",
                "country": "AO",
                "delivery_types": ["pickup"]
            }),
        )
        .await;
    let company_id = company["id"].as_i64().unwrap();

    let items = json!([{ "product_name": "Tea", "unit_price": 100.0, "quantity": 1 }]);
    let (status, err) = app
        .place_order("cust-1", order_body(company_id, "pickup", items))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&err), ErrorCode::CompanyNotApproved.code());

    let (status, err) = app
        .post(
            &format!("/api/companies/{company_id}/reject"),
            (ADMIN, UserRole::Admin),
            json!({ "reason": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{err}");
}

#[tokio::test]
async fn test_delivery_lifecycle_with_courier_and_ratings() {
    let app = TestApp::new().await;
    let owner = ("owner-1", UserRole::Company);
    let customer = ("cust-1", UserRole::Customer);
    let rider = ("rider-1", UserRole::Courier);
    let company_id = app.approved_company("owner-1", "NIF-1", "Luanda").await;

    let (status, courier) = app
        .post(
            "/api/couriers",
            rider,
            json!({ "full_name": "Rider One", "phone": "+244911111111", "vehicle_type": "motorcycle" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{courier}");
    let courier_id = courier["id"].as_i64().unwrap();

    // offline until approved
    let (status, err) = app
        .send(
            "PUT",
            &format!("/api/couriers/{courier_id}/availability"),
            Some(rider),
            Some(json!({ "is_available": true })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&err), ErrorCode::CourierNotApproved.code());

    app.post(&format!("/api/couriers/{courier_id}/approve"), (ADMIN, UserRole::Admin), json!({}))
        .await;
    let (status, courier) = app
        .send(
            "PUT",
            &format!("/api/couriers/{courier_id}/availability"),
            Some(rider),
            Some(json!({ "is_available": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{courier}");
    assert_eq!(courier["is_available"], true);

    let items = json!([{ "product_name": "Grill", "unit_price": 1500.0, "quantity": 2 }]);
    let (_, order) = app
        .place_order("cust-1", order_body(company_id, "platform_delivery", items))
        .await;
    let order_id = order["id"].as_i64().unwrap();
    let status_uri = format!("/api/orders/{order_id}/status");

    // customers cannot confirm their own order
    let (status, _) = app.post(&status_uri, customer, json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for next in ["confirmed", "preparing", "ready"] {
        let (status, o) = app.post(&status_uri, owner, json!({ "status": next })).await;
        assert_eq!(status, StatusCode::OK, "{o}");
        assert_eq!(o["status"], next);
    }

    // a ready platform order cannot leave without a courier
    let (status, err) = app.post(&status_uri, owner, json!({ "status": "in_delivery" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{err}");

    let (_, open) = app.get("/api/orders/available", rider).await;
    assert!(
        open.as_array()
            .unwrap()
            .iter()
            .any(|o| o["id"].as_i64() == Some(order_id))
    );

    let (status, assigned) = app
        .post(&format!("/api/orders/{order_id}/assign"), rider, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{assigned}");
    assert_eq!(assigned["courier_id"].as_i64(), Some(courier_id));

    for next in ["in_delivery", "delivered"] {
        let (status, o) = app.post(&status_uri, rider, json!({ "status": next })).await;
        assert_eq!(status, StatusCode::OK, "{o}");
        assert_eq!(o["status"], next);
    }

    let ratings_uri = format!("/api/orders/{order_id}/ratings");
    let (status, r) = app
        .post(&ratings_uri, customer, json!({ "target_type": "company", "stars": 5 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{r}");
    assert_eq!(r["target_id"].as_i64(), Some(company_id));

    let (status, r) = app
        .post(&ratings_uri, customer, json!({ "target_type": "courier", "stars": 4, "comment": "fast" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{r}");
    assert_eq!(r["target_id"].as_i64(), Some(courier_id));

    let (status, err) = app
        .post(&ratings_uri, customer, json!({ "target_type": "company", "stars": 1 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&err), ErrorCode::RatingAlreadyExists.code());

    let (_, summary) = app
        .get(&format!("/api/companies/{company_id}/ratings/summary"), customer)
        .await;
    assert_eq!(summary["count"].as_i64(), Some(1));
    assert_eq!(summary["average"].as_f64(), Some(5.0));

    let (_, earnings) = app
        .get(&format!("/api/companies/{company_id}/earnings"), owner)
        .await;
    assert_eq!(earnings["delivered_orders"].as_i64(), Some(1));
    assert_eq!(earnings["gross_sales"].as_f64(), Some(3000.0));
    assert_eq!(earnings["commission_total"].as_f64(), Some(450.0));
    assert_eq!(earnings["net_earnings"].as_f64(), Some(2550.0));

    let (_, summary) = app.get("/api/admin/summary", (ADMIN, UserRole::Admin)).await;
    assert_eq!(summary["orders_by_status"]["delivered"].as_i64(), Some(1));
    assert_eq!(summary["orders_by_status"]["pending"].as_i64(), Some(0));
    assert_eq!(summary["commission_total"].as_f64(), Some(450.0));
}

#[tokio::test]
async fn test_notifications_read_flow() {
    let app = TestApp::new().await;
    let owner = ("owner-1", UserRole::Company);
    let company_id = app.approved_company("owner-1", "NIF-1", "Luanda").await;

    let items = json!([{ "product_name": "Cake", "unit_price": 300.0, "quantity": 1 }]);
    app.place_order("cust-1", order_body(company_id, "pickup", items.clone())).await;
    app.place_order("cust-1", order_body(company_id, "pickup", items)).await;

    let (_, list) = app.get("/api/notifications?unread_only=true", owner).await;
    let list = list.as_array().unwrap().clone();
    // approval notice + two new orders
    assert_eq!(list.len(), 3);

    let first = list[0]["id"].as_i64().unwrap();
    let (status, _) = app
        .post(&format!("/api/notifications/{first}/read"), owner, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    // someone else's notification is invisible
    let (status, err) = app
        .post(&format!("/api/notifications/{first}/read"), ("cust-1", UserRole::Customer), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&err), ErrorCode::NotificationNotFound.code());

    let (_, marked) = app.post("/api/notifications/read-all", owner, json!({})).await;
    assert_eq!(marked["data"].as_u64(), Some(2));

    let (_, unread) = app.get("/api/notifications/unread-count", owner).await;
    assert_eq!(unread["data"]["unread"].as_i64(), Some(0));
}

#[tokio::test]
async fn test_courier_waits_for_company_confirmation() {
    let app = TestApp::new().await;
    let owner = ("owner-1", UserRole::Company);
    let rider = ("rider-1", UserRole::Courier);
    let company_id = app.approved_company("owner-1", "NIF-1", "Luanda").await;

    let (_, courier) = app
        .post(
            "/api/couriers",
            rider,
            json!({ "full_name": "Rider One", "phone": "+244911111111", "vehicle_type": "bicycle" }),
        )
        .await;
    let courier_id = courier["id"].as_i64().unwrap();
    app.post(&format!("/api/couriers/{courier_id}/approve"), (ADMIN, UserRole::Admin), json!({}))
        .await;
    app.send(
        "PUT",
        &format!("/api/couriers/{courier_id}/availability"),
        Some(rider),
        Some(json!({ "is_available": true })),
    )
    .await;

    let items = json!([{ "product_name": "Wrap", "unit_price": 700.0, "quantity": 1 }]);
    let (_, order) = app
        .place_order("cust-1", order_body(company_id, "platform_delivery", items))
        .await;
    let order_id = order["id"].as_i64().unwrap();
    let assign_uri = format!("/api/orders/{order_id}/assign");

    let (status, err) = app.post(&assign_uri, rider, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{err}");
    assert_eq!(error_code(&err), ErrorCode::InvalidStatusTransition.code());

    let (status, err) = app
        .post(&assign_uri, (ADMIN, UserRole::Admin), json!({ "courier_id": courier_id }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{err}");

    let (_, detail) = app
        .get(&format!("/api/orders/{order_id}"), (ADMIN, UserRole::Admin))
        .await;
    assert_eq!(detail["courier_id"], Value::Null);

    app.post(&format!("/api/orders/{order_id}/status"), owner, json!({ "status": "confirmed" }))
        .await;
    let (status, assigned) = app.post(&assign_uri, rider, json!({})).await;
    assert_eq!(status, StatusCode::OK, "{assigned}");
    assert_eq!(assigned["courier_id"].as_i64(), Some(courier_id));
}

#[tokio::test]
async fn test_customer_cancel_notifies_company_owner() {
    let app = TestApp::new().await;
    let company_id = app.approved_company("owner-1", "NIF-1", "Luanda").await;

    let items = json!([{ "product_name": "Salad", "unit_price": 400.0, "quantity": 1 }]);
    let (_, order) = app
        .place_order("cust-1", order_body(company_id, "pickup", items))
        .await;
    let order_id = order["id"].as_i64().unwrap();

    let (status, _) = app
        .post(
            &format!("/api/orders/{order_id}/cancel"),
            ("cust-1", UserRole::Customer),
            json!({ "reason": "too late" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.get("/api/notifications", ("owner-1", UserRole::Company)).await;
    let cancelled: Vec<&Value> = list
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["kind"] == "order_status_changed" && n["order_id"].as_i64() == Some(order_id))
        .collect();
    assert_eq!(cancelled.len(), 1);
    assert!(cancelled[0]["body"].as_str().unwrap().contains("too late"));

    // the customer made the change and is not notified about it
    let (_, list) = app.get("/api/notifications", ("cust-1", UserRole::Customer)).await;
    assert!(
        list.as_array()
            .unwrap()
            .iter()
            .all(|n| n["kind"] != "order_status_changed")
    );
}
