/**
* filename : executor
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::future::{pending, Future};
use std::time::Duration;

use crate::exchange::traits::Exchange;
use crate::models::execution::{ExecutionOutcome, ExecutionReport};
use crate::models::plan::StrategyPlan;
use crate::utils::logging;

/// 실행 계획 구동기
///
/// 계획의 주문을 순서대로 하나씩 제출한다. 실패한 주문은 기록만 하고 다음 주문으로 넘어가며,
/// 자동 재시도는 하지 않는다. 시간 분할 계획은 주문 사이에 계획의 대기 시간을 둔다.
pub struct Executor;

impl Executor {
  /// 계획 전체 실행
  pub async fn execute<E>(plan: &StrategyPlan, exchange: &mut E) -> ExecutionReport
  where
    E: Exchange + ?Sized,
  {
    Self::execute_until(plan, exchange, pending::<()>()).await
  }

  /// 중단 신호가 올 때까지 계획 실행
  ///
  /// 중단 신호는 주문과 주문 사이에서만 확인한다. 진행 중인 제출은 끝까지 기다린다.
  pub async fn execute_until<E, C>(plan: &StrategyPlan, exchange: &mut E, cancel: C) -> ExecutionReport
  where
    E: Exchange + ?Sized,
    C: Future<Output = ()>,
  {
    tokio::pin!(cancel);

    let total = plan.len();
    let mut report = ExecutionReport::new(total);

    for (i, request) in plan.requests().iter().enumerate() {
      let wait = if i == 0 { Duration::ZERO } else { plan.delay() };
      if !wait.is_zero() {
        log::info!("Waiting {}s before next order...", wait.as_secs_f64());
      }

      let cancelled = tokio::select! {
        biased;
        _ = &mut cancel => true,
        _ = Self::pause(wait) => false,
      };
      if cancelled {
        log::warn!("Execution cancelled: {} of {} order(s) not submitted", total - i, total);
        report.cancelled = true;
        break;
      }

      logging::log_order_attempt(i + 1, total, request);
      match exchange.submit_order(request.clone()).await {
        Ok(ack) => {
          logging::log_order_accepted(request, &ack);
          report.push(ExecutionOutcome::accepted(request.clone(), ack));
        }
        Err(e) => {
          let reason = e.reason();
          logging::log_order_rejected(request, &reason);
          report.push(ExecutionOutcome::rejected(request.clone(), reason));
        }
      }
    }

    report
  }

  async fn pause(wait: Duration) {
    if !wait.is_zero() {
      tokio::time::sleep(wait).await;
    }
  }
}
