//! Fleet management and availability service

use uuid::Uuid;
use validator::Validate;

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
    models::{
        car::{
            AvailableCarsQuery, Car, CarQuery, CategorySummary, CheckAvailabilityRequest, CreateCar,
            FeaturedCarsQuery, UpdateCar,
        },
        pagination::MAX_LIMIT,
        CarStatus, PageRequest, Pagination,
    },
    rental::{availability, Availability, BookingWindow},
    repository::Repository,
};

/// Featured strip size when the client does not ask for one
const DEFAULT_FEATURED_LIMIT: i64 = 8;

#[derive(Clone)]
pub struct CarsService {
    repository: Repository,
    pagination: PaginationConfig,
}

impl CarsService {
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    /// Public catalogue of active cars
    pub async fn list(&self, query: &CarQuery) -> AppResult<(Vec<Car>, Pagination)> {
        let page = PageRequest::new(query.page, query.limit, self.pagination.default_limit);
        let (cars, total) = self.repository.cars.list(query, page).await?;
        Ok((cars, Pagination::new(page, total)))
    }

    /// Cars free for the whole requested period
    pub async fn list_available(
        &self,
        query: &AvailableCarsQuery,
    ) -> AppResult<(Vec<Car>, Pagination)> {
        if query.return_date <= query.pickup_date {
            return Err(AppError::invalid_field(
                "returnDate",
                "Return date must be after pickup date",
            ));
        }
        let page = PageRequest::new(query.page, query.limit, self.pagination.default_limit);
        let (cars, total) = self.repository.cars.list_available(query, page).await?;
        Ok((cars, Pagination::new(page, total)))
    }

    /// Featured cars ready to rent
    pub async fn featured(&self, query: &FeaturedCarsQuery) -> AppResult<Vec<Car>> {
        let limit = query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT).clamp(1, MAX_LIMIT);
        self.repository.cars.list_featured(limit).await
    }

    /// Every category with its count of active cars
    pub async fn categories(&self) -> AppResult<Vec<CategorySummary>> {
        let counts = self.repository.cars.count_by_category().await?;
        Ok(CategorySummary::from_counts(&counts))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Car> {
        self.repository.cars.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateCar) -> AppResult<Car> {
        data.validate()?;
        let car = self.repository.cars.create(&data).await?;
        tracing::info!(car_id = %car.id, plate = %car.license_plate, "Car created");
        Ok(car)
    }

    pub async fn update(&self, id: Uuid, data: UpdateCar) -> AppResult<Car> {
        data.validate()?;
        self.repository.cars.update(id, &data).await
    }

    pub async fn update_status(&self, id: Uuid, status: CarStatus) -> AppResult<Car> {
        let car = self.repository.cars.update_status(id, status).await?;
        tracing::info!(car_id = %id, status = %status, "Car status changed");
        Ok(car)
    }

    /// Delete a car that is not engaged in a confirmed or running rental
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.cars.get_by_id(id).await?;

        let engaged = self.repository.cars.count_engaged_bookings(id).await?;
        if engaged > 0 {
            return Err(AppError::StateConflict(format!(
                "Car has {} confirmed or active booking(s) and cannot be deleted",
                engaged
            )));
        }

        self.repository.cars.delete(id).await?;
        tracing::info!(car_id = %id, "Car deleted");
        Ok(())
    }

    /// Answer whether a car can be booked for a period, without booking it
    pub async fn check_availability(
        &self,
        id: Uuid,
        request: &CheckAvailabilityRequest,
    ) -> AppResult<Availability> {
        let window = BookingWindow::new(request.start_date, request.end_date)?;
        let car = self.repository.cars.get_by_id(id).await?;
        let existing = self
            .repository
            .bookings
            .blocking_for_car(&self.repository.pool, id, &window)
            .await?;
        Ok(availability::check(&car, &window, &existing))
    }
}
