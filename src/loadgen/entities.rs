//! Randomized cars and wheels, and the SQL that stores them.

use rand::Rng;
use uuid::Uuid;

const CAR_MODELS: &[(&str, &[&str])] = &[
    ("bmw", &["m1", "m2", "x4", "m8"]),
    ("audi", &["a3", "q5", "tt", "r8"]),
    ("tesla", &["3", "s", "x", "y"]),
    ("porsche", &["911", "macan", "panamera"]),
];
const WHEEL_COMPANIES: &[&str] = &["goodyear", "bridgestone", "michelin", "pirelli"];

/// Table and index definitions sent before any traffic.
pub const SCHEMA: &[&str] = &[
    "create table if not exists car (\
        id text primary key, make text, model text, year integer)",
    "create index if not exists user_idx_car_1 on car (make)",
    "create index if not exists user_idx_car_2 on car (model)",
    "create table if not exists wheel (\
        id text primary key, air_pressure integer, company text)",
    "create index if not exists user_idx_wheel_1 on wheel(air_pressure)",
    "create table if not exists car_wheel (\
        car_id text, wheel_id text, \
        primary key (car_id, wheel_id), \
        foreign key (car_id) references car (id), \
        foreign key (wheel_id) references wheel (id))",
];

/// Join query returning one row per stored car, linked wheels or not.
pub const QUERY_CARS: &str = "select distinct c.id from car c \
    left join car_wheel cw on cw.car_id = c.id \
    left join wheel w on cw.wheel_id = w.id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub id: Uuid,
    pub make: &'static str,
    pub model: &'static str,
    pub year: u16,
}

impl Car {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (make, models) = CAR_MODELS[rng.gen_range(0..CAR_MODELS.len())];
        Self {
            id: Uuid::new_v4(),
            make,
            model: models[rng.gen_range(0..models.len())],
            year: rng.gen_range(1989..=2020),
        }
    }

    pub fn insert_sql(&self) -> String {
        format!(
            "insert into car (id, make, model, year) values (\"{}\", \"{}\", \"{}\", {})",
            self.id, self.make, self.model, self.year
        )
    }

    /// Row linking this car to `wheel`.
    pub fn link_sql(&self, wheel: &Wheel) -> String {
        format!(
            "insert into car_wheel (car_id, wheel_id) values (\"{}\", \"{}\")",
            self.id, wheel.id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wheel {
    pub id: Uuid,
    pub air_pressure: u8,
    pub company: &'static str,
}

impl Wheel {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            id: Uuid::new_v4(),
            air_pressure: rng.gen_range(25..40),
            company: WHEEL_COMPANIES[rng.gen_range(0..WHEEL_COMPANIES.len())],
        }
    }

    pub fn insert_sql(&self) -> String {
        format!(
            "insert into wheel (id, air_pressure, company) values (\"{}\", {}, \"{}\")",
            self.id, self.air_pressure, self.company
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_car_uses_catalogue() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let car = Car::random(&mut rng);
            let (_, models) = CAR_MODELS
                .iter()
                .find(|(make, _)| *make == car.make)
                .expect("make not in catalogue");
            assert!(models.contains(&car.model));
            assert!((1989..=2020).contains(&car.year));
        }
    }

    #[test]
    fn test_random_wheel_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let wheel = Wheel::random(&mut rng);
            assert!((25..40).contains(&wheel.air_pressure));
            assert!(WHEEL_COMPANIES.contains(&wheel.company));
        }
    }

    #[test]
    fn test_sql_rendering() {
        let car = Car {
            id: Uuid::nil(),
            make: "tesla",
            model: "y",
            year: 2020,
        };
        let wheel = Wheel {
            id: Uuid::nil(),
            air_pressure: 30,
            company: "pirelli",
        };

        assert_eq!(
            car.insert_sql(),
            "insert into car (id, make, model, year) values \
             (\"00000000-0000-0000-0000-000000000000\", \"tesla\", \"y\", 2020)"
        );
        assert_eq!(
            wheel.insert_sql(),
            "insert into wheel (id, air_pressure, company) values \
             (\"00000000-0000-0000-0000-000000000000\", 30, \"pirelli\")"
        );
        assert!(car.link_sql(&wheel).starts_with("insert into car_wheel"));
    }
}
