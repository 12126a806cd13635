use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::order::{OrderAck, OrderId, OrderRequest, OrderSide};

/// 주문 하나의 제출 결과
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OutcomeResult {
    Accepted(OrderAck),
    Rejected { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionOutcome {
    pub request: OrderRequest,
    pub result: OutcomeResult,
}

impl ExecutionOutcome {
    pub fn accepted(request: OrderRequest, ack: OrderAck) -> Self {
        ExecutionOutcome { request, result: OutcomeResult::Accepted(ack) }
    }

    pub fn rejected(request: OrderRequest, reason: impl Into<String>) -> Self {
        ExecutionOutcome { request, result: OutcomeResult::Rejected { reason: reason.into() } }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.result, OutcomeResult::Accepted(_))
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        match &self.result {
            OutcomeResult::Accepted(ack) => Some(&ack.order_id),
            OutcomeResult::Rejected { .. } => None,
        }
    }
}

/// 실행 결과 모음 (제출 순서 유지)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExecutionReport {
    pub outcomes: Vec<ExecutionOutcome>,
    /// 중단 신호로 남은 주문을 보내지 않았는지 여부
    pub cancelled: bool,
    /// 계획에 들어있던 전체 주문 수
    pub planned: usize,
}

impl ExecutionReport {
    pub fn new(planned: usize) -> Self {
        ExecutionReport { outcomes: Vec::with_capacity(planned), cancelled: false, planned }
    }

    pub fn push(&mut self, outcome: ExecutionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_accepted()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.accepted_count()
    }

    /// 접수된 주문 중 매수 건수
    pub fn buy_count(&self) -> usize {
        self.count_accepted_side(OrderSide::Buy)
    }

    /// 접수된 주문 중 매도 건수
    pub fn sell_count(&self) -> usize {
        self.count_accepted_side(OrderSide::Sell)
    }

    fn count_accepted_side(&self, side: OrderSide) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.is_accepted() && o.request.side == side)
            .count()
    }

    /// 체결 수량 합계
    ///
    /// 거래소가 executedQty 를 돌려주지 않으면 요청 수량으로 간주한다.
    pub fn filled_quantity(&self) -> Decimal {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                OutcomeResult::Accepted(ack) => Some(ack.executed_qty.unwrap_or(o.request.quantity)),
                OutcomeResult::Rejected { .. } => None,
            })
            .sum()
    }

    /// 계획된 모든 주문이 접수되었는지
    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && self.outcomes.len() == self.planned && self.rejected_count() == 0
    }

    /// 결과 요약 문자열 생성
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Execution Summary:\n\
             Planned Orders:    {}\n\
             Successful Orders: {}\n\
             Failed Orders:     {}\n\
             Buy / Sell:        {} / {}\n\
             Total Filled:      {}",
            self.planned,
            self.accepted_count(),
            self.rejected_count(),
            self.buy_count(),
            self.sell_count(),
            self.filled_quantity().normalize(),
        );
        if self.cancelled {
            text.push_str(&format!(
                "\nCancelled:         {} order(s) not submitted",
                self.planned - self.outcomes.len()
            ));
        }
        text
    }
}
