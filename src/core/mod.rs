//! 주문 실행 알고리즘의 핵심 구현체

pub mod executor;
pub mod grid_splitter;
pub mod planner;
pub mod twap_splitter;

pub use executor::Executor;
pub use grid_splitter::{plan_grid, GridSplitter};
pub use planner::plan;
pub use twap_splitter::{plan_twap, TwapSplitter};
