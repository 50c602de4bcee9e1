//! A simulated user issuing inserts and queries.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time;

use crate::lifecycle::ShutdownListener;
use crate::loadgen::client::WorkerClient;
use crate::loadgen::entities::{Car, Wheel, QUERY_CARS, SCHEMA};
use crate::observability::metrics;
use crate::settings::{Manager, Settings};

/// State store key holding the last observed number of cars.
pub const CAR_COUNT_KEY: &str = "car_count";

const WHEELS_PER_CAR: usize = 4;

// Task weights: one insert for every five queries.
const INSERT_WEIGHT: u32 = 1;
const QUERY_WEIGHT: u32 = 5;

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Settings say generation is off.
    Disabled,
    /// An insert was due but `car_count` already reached `capacity`.
    AtCapacity,
    Inserted,
    InsertFailed,
    /// A query ran and stored this many cars.
    Queried(u64),
    QueryFailed,
}

pub struct Monkey {
    id: usize,
    client: WorkerClient,
    manager: Arc<Manager>,
    rng: StdRng,
}

impl Monkey {
    pub fn new(id: usize, client: WorkerClient, manager: Arc<Manager>) -> Self {
        Self::with_rng(id, client, manager, StdRng::from_entropy())
    }

    pub fn with_rng(id: usize, client: WorkerClient, manager: Arc<Manager>, rng: StdRng) -> Self {
        Self {
            id,
            client,
            manager,
            rng,
        }
    }

    /// Create the tables and indexes. Failures are logged and ignored.
    pub async fn prepare_schema(&self) {
        for statement in SCHEMA {
            tracing::debug!(monkey = self.id, sql = %statement, "Executing schema statement");
            if let Err(e) = self.client.exec(statement).await {
                tracing::warn!(monkey = self.id, error = %e, "Failed to execute schema statement");
            }
        }
    }

    /// Last car count recorded in the state store, 0 if none.
    pub fn car_count(&self) -> u64 {
        match self.manager.state().get_as::<u64>(CAR_COUNT_KEY) {
            Ok(count) => count.unwrap_or(0),
            Err(e) => {
                tracing::warn!(monkey = self.id, error = %e, "Ignoring unreadable car count");
                0
            }
        }
    }

    /// Run one weighted task against a fresh settings snapshot.
    pub async fn step(&mut self) -> Step {
        let snapshot = self.manager.get();
        if !snapshot.settings.is_enabled() {
            return Step::Disabled;
        }

        if self.rng.gen_range(0..INSERT_WEIGHT + QUERY_WEIGHT) < INSERT_WEIGHT {
            self.insert_car(&snapshot.settings).await
        } else {
            self.query_cars().await
        }
    }

    /// Insert one car with four wheels, unless capacity is reached.
    pub async fn insert_car(&mut self, settings: &Settings) -> Step {
        let count = self.car_count();
        if !settings.has_room_for(count) {
            tracing::debug!(monkey = self.id, count, capacity = ?settings.capacity, "Capacity reached, skipping insert");
            return Step::AtCapacity;
        }

        let mut wheels = Vec::with_capacity(WHEELS_PER_CAR);
        for _ in 0..WHEELS_PER_CAR {
            let wheel = Wheel::random(&mut self.rng);
            match self.client.exec(&wheel.insert_sql()).await {
                Ok(_) => wheels.push(wheel),
                Err(e) => tracing::error!(monkey = self.id, wheel = %wheel.id, error = %e, "Failed to persist wheel"),
            }
        }

        let car = Car::random(&mut self.rng);
        if let Err(e) = self.client.exec(&car.insert_sql()).await {
            tracing::error!(monkey = self.id, car = %car.id, error = %e, "Failed to persist car");
            return Step::InsertFailed;
        }

        for wheel in &wheels {
            if let Err(e) = self.client.exec(&car.link_sql(wheel)).await {
                tracing::error!(monkey = self.id, car = %car.id, error = %e, "Failed to persist car wheel relationship");
            }
        }
        Step::Inserted
    }

    /// Count stored cars and record the result under [`CAR_COUNT_KEY`].
    pub async fn query_cars(&self) -> Step {
        match self.client.query(QUERY_CARS).await {
            Ok(res) => {
                let cars = u64::try_from(res.rows_affected).unwrap_or(0);
                self.manager.state().set(CAR_COUNT_KEY, cars);
                metrics::record_car_count(cars);
                tracing::info!(monkey = self.id, cars, "Query returned cars");
                Step::Queried(cars)
            }
            Err(e) => {
                tracing::error!(monkey = self.id, error = %e, "Failed to query cars");
                Step::QueryFailed
            }
        }
    }

    /// Prepare the schema, then loop with a 0-1s pause until shutdown.
    pub async fn run(mut self, mut shutdown: ShutdownListener) {
        tracing::info!(monkey = self.id, "Monkey starting");
        self.prepare_schema().await;

        loop {
            let wait = Duration::from_millis(self.rng.gen_range(0..=1000));
            tokio::select! {
                _ = time::sleep(wait) => {
                    let step = self.step().await;
                    tracing::trace!(monkey = self.id, ?step, "Step finished");
                }
                _ = shutdown.wait() => {
                    tracing::info!(monkey = self.id, "Monkey received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
