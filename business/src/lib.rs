pub mod application {
    pub mod cart {
        pub mod check_stock;
        pub mod item_controller;
        pub mod store;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod cart {
        pub mod errors;
        pub mod model;
        pub mod repository;
        pub mod stock;
        pub mod use_cases {
            pub mod check_stock;
        }
    }
    pub mod shared {
        pub mod value_objects;
    }
}
