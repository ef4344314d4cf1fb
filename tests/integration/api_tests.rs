//! API integration tests
//!
//! These run against a live server (and its database). Tokens are minted with
//! the same secret the server verifies with, taken from `JWT_SECRET`.

use car_rental_server::models::{UserClaims, UserRole};
use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn token(role: UserRole) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = Utc::now();
    UserClaims {
        sub: Uuid::new_v4(),
        email: format!("{}@example.sy", Uuid::new_v4()),
        role,
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    }
    .create_token(&secret)
    .expect("Failed to sign token")
}

/// Add a fresh car to the fleet and return its id
async fn create_car(client: &Client, admin: &str) -> String {
    let plate = format!("DM-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let response = client
        .post(format!("{}/cars", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "brand": "Kia",
            "model": "Cerato",
            "year": 2022,
            "color": "White",
            "licensePlate": plate,
            "category": "MIDSIZE",
            "transmission": "AUTOMATIC",
            "fuelType": "PETROL",
            "seats": 5,
            "pricePerDay": 40000,
            "deposit": 100000
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"].as_str().expect("No car id").to_string()
}

async fn book(
    client: &Client,
    customer: &str,
    car_id: &str,
    start_in_days: i64,
    days: i64,
) -> reqwest::Response {
    let start = Utc::now() + Duration::days(start_in_days);
    client
        .post(format!("{}/bookings", BASE_URL))
        .bearer_auth(customer)
        .json(&json!({
            "carId": car_id,
            "startDate": start,
            "endDate": start + Duration::days(days),
            "pickupLocation": "Damascus Airport",
            "returnLocation": "Damascus Airport"
        }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_cars_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/cars?limit=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["data"].is_array());
    assert_eq!(body["pagination"]["limit"], 5);
}

#[tokio::test]
#[ignore]
async fn test_booking_is_priced_on_the_server() {
    let client = Client::new();
    let admin = token(UserRole::Admin);
    let customer = token(UserRole::Customer);
    let car_id = create_car(&client, &admin).await;

    let response = book(&client, &customer, &car_id, 30, 5).await;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let booking = &body["data"];
    assert_eq!(booking["status"], "PENDING");
    assert_eq!(booking["totalDays"], 5);
    assert_eq!(booking["subtotal"], 200000.0);
    assert_eq!(booking["totalAmount"], 200000.0);
    assert_eq!(booking["depositAmount"], 100000.0);
    assert!(booking["bookingNumber"].as_str().unwrap().starts_with("BK"));
}

#[tokio::test]
#[ignore]
async fn test_overlapping_booking_is_refused() {
    let client = Client::new();
    let admin = token(UserRole::Admin);
    let car_id = create_car(&client, &admin).await;

    let first = book(&client, &token(UserRole::Customer), &car_id, 40, 5).await;
    assert_eq!(first.status(), 201);

    let second = book(&client, &token(UserRole::Customer), &car_id, 42, 5).await;
    assert_eq!(second.status(), 400);
    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);

    // Back-to-back rentals share the boundary instant
    let next = book(&client, &token(UserRole::Customer), &car_id, 45, 2).await;
    assert_eq!(next.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_check_availability_reports_next_free_date() {
    let client = Client::new();
    let admin = token(UserRole::Admin);
    let car_id = create_car(&client, &admin).await;

    let booked = book(&client, &token(UserRole::Customer), &car_id, 50, 5).await;
    assert_eq!(booked.status(), 201);
    let booked: Value = booked.json().await.expect("Failed to parse response");

    let start = Utc::now() + Duration::days(51);
    let response = client
        .post(format!("{}/cars/{}/check-availability", BASE_URL, car_id))
        .json(&json!({ "startDate": start, "endDate": start + Duration::days(2) }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["nextAvailable"], booked["data"]["endDate"]);
}

#[tokio::test]
#[ignore]
async fn test_rental_lifecycle() {
    let client = Client::new();
    let admin = token(UserRole::Admin);
    let customer = token(UserRole::Customer);
    let car_id = create_car(&client, &admin).await;

    let response = book(&client, &customer, &car_id, 60, 3).await;
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["data"]["id"].as_str().expect("No booking id").to_string();

    // Somebody else's booking
    let response = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, id))
        .bearer_auth(token(UserRole::Customer))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let response = client
        .post(format!("{}/bookings/{}/confirm", BASE_URL, id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "CONFIRMED");

    let response = client
        .post(format!("{}/bookings/{}/activate", BASE_URL, id))
        .bearer_auth(&admin)
        .json(&json!({ "type": "pickup", "mileage": 12000, "fuel": 100, "condition": "Clean" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/cars/{}", BASE_URL, car_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "RENTED");

    // Active rentals cannot be cancelled
    let response = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, id))
        .bearer_auth(&customer)
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/bookings/{}/complete", BASE_URL, id))
        .bearer_auth(&admin)
        .json(&json!({ "type": "return", "mileage": 12450, "fuel": 80 }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert_eq!(body["data"]["returnMileage"], 12450);

    let response = client
        .get(format!("{}/cars/{}", BASE_URL, car_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "AVAILABLE");
    assert_eq!(body["data"]["mileage"], 12450);
}
