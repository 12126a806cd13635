use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::order::OrderRequest;

/// 실행 계획의 출처
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanKind {
    /// 단일 주문 (market / limit / stop-limit)
    Single,
    /// 시간 분할 (TWAP)
    Twap,
    /// 가격 사다리 (Grid)
    Grid,
}

/// 순서가 정해진 주문 요청 목록과 주문 사이 대기 시간
///
/// 분할기가 한 번 만든 뒤에는 변경되지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPlan {
    kind: PlanKind,
    requests: Vec<OrderRequest>,
    delay: Duration,
}

impl StrategyPlan {
    pub fn single(request: OrderRequest) -> Self {
        StrategyPlan { kind: PlanKind::Single, requests: vec![request], delay: Duration::ZERO }
    }

    pub fn twap(requests: Vec<OrderRequest>, delay: Duration) -> Self {
        StrategyPlan { kind: PlanKind::Twap, requests, delay }
    }

    pub fn grid(requests: Vec<OrderRequest>) -> Self {
        StrategyPlan { kind: PlanKind::Grid, requests, delay: Duration::ZERO }
    }

    pub fn kind(&self) -> PlanKind {
        self.kind
    }

    pub fn requests(&self) -> &[OrderRequest] {
        &self.requests
    }

    /// 연속된 두 주문 사이 대기 시간 (첫 주문 전에는 대기하지 않음)
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// 모든 주문이 제출될 때까지 걸리는 예상 시간
    pub fn estimated_duration(&self) -> Duration {
        let gaps = u32::try_from(self.requests.len().saturating_sub(1)).unwrap_or(u32::MAX);
        self.delay.saturating_mul(gaps)
    }
}
