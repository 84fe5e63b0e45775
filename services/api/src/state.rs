//! Application state shared across handlers

use crate::{
    models::{Apartment, Booking, Feedback, InstallmentPlan, Inventory, Payment, User},
    repositories::Store,
    services::CrudService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub apartments: CrudService<Apartment>,
    pub users: CrudService<User>,
    pub bookings: CrudService<Booking>,
    pub payments: CrudService<Payment>,
    pub installment_plans: CrudService<InstallmentPlan>,
    pub inventories: CrudService<Inventory>,
    pub feedbacks: CrudService<Feedback>,
}

impl AppState {
    /// Wire one service per resource on top of `store`
    pub fn new(store: Store) -> Self {
        Self {
            apartments: CrudService::new(store.gateway()),
            users: CrudService::new(store.gateway()),
            bookings: CrudService::new(store.gateway()),
            payments: CrudService::new(store.gateway()),
            installment_plans: CrudService::new(store.gateway()),
            inventories: CrudService::new(store.gateway()),
            feedbacks: CrudService::new(store.gateway()),
            store,
        }
    }
}
