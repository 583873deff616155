//! Random demo cars

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::NewCar;

const MODELS: [&str; 10] = [
    "BMW",
    "Mercedes-Benz",
    "Ford",
    "Chevrolet",
    "Mitsubishi",
    "Nissan",
    "Volvo",
    "Audi",
    "Toyota",
    "Volkswagen",
];

const NAMES: [&str; 10] = ["XT6", "ZCT33", "94", "e34", "o81", "GT-311", "NAZ", "91j", "Sa8AI", "M0DE1"];

/// Random `"<model> <name>"` pair
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let model = MODELS.choose(rng).copied().unwrap_or(MODELS[0]);
    let name = NAMES.choose(rng).copied().unwrap_or(NAMES[0]);
    format!("{} {}", model, name)
}

/// Random `rgb(r, g, b)` color
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (r, g, b): (u8, u8, u8) = rng.gen();
    format!("rgb({}, {}, {})", r, g, b)
}

/// Generate `count` random cars using the thread-local RNG
pub fn generate_cars(count: usize) -> Vec<NewCar> {
    let mut rng = rand::thread_rng();
    generate_cars_with(&mut rng, count)
}

pub fn generate_cars_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<NewCar> {
    (0..count)
        .map(|_| NewCar::new(random_name(rng), random_color(rng)))
        .collect()
}
