// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Plan tracing and explanation
//!
//! Records every greedy round of the optimizer so a chosen ordering can be
//! explained after the fact.

use serde::Serialize;
use std::time::{Duration, Instant};

/// Trace of one optimizer run
#[derive(Debug, Clone, Serialize)]
pub struct PlanTrace {
    pub steps: Vec<TraceStep>,
    pub total_duration: Duration,
}

/// One greedy round
#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    /// Number of eligible fragments considered
    pub candidates: usize,
    /// Rendered chosen fragment
    pub chosen: String,
    pub cost: f64,
    /// Variables bound after the step committed
    pub bound: Vec<String>,
    pub duration: Duration,
}

/// Builder for creating plan traces
pub struct PlanTracer {
    steps: Vec<TraceStep>,
    start_time: Instant,
    current_step_start: Instant,
}

impl PlanTracer {
    /// Create a new plan tracer
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            steps: Vec::new(),
            start_time: now,
            current_step_start: now,
        }
    }

    /// Record a committed round and start timing the next one
    pub fn record(&mut self, candidates: usize, chosen: String, cost: f64, bound: Vec<String>) {
        self.steps.push(TraceStep {
            candidates,
            chosen,
            cost,
            bound,
            duration: self.current_step_start.elapsed(),
        });
        self.current_step_start = Instant::now();
    }

    pub fn finalize(self) -> PlanTrace {
        PlanTrace {
            steps: self.steps,
            total_duration: self.start_time.elapsed(),
        }
    }
}

impl Default for PlanTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanTrace {
    /// Format the trace for display
    pub fn format_trace(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Plan Trace (total: {:.2}ms)\n",
            self.total_duration.as_secs_f64() * 1000.0
        ));
        output.push_str(&"=".repeat(50));
        output.push('\n');

        for (i, step) in self.steps.iter().enumerate() {
            output.push_str(&format!(
                "{}. {} ({:.2}ms)\n",
                i + 1,
                step.chosen,
                step.duration.as_secs_f64() * 1000.0
            ));
            output.push_str(&format!("   Candidates: {}\n", step.candidates));
            output.push_str(&format!("   Cost: {:.2}\n", step.cost));
            output.push_str(&format!("   Bound: {}\n", step.bound.join(", ")));
        }

        output.push_str("Summary:\n");
        output.push_str(&"-".repeat(20));
        output.push('\n');
        let total: f64 = self.steps.iter().map(|s| s.cost).sum();
        output.push_str(&format!("Total estimated cost: {:.2}\n", total));
        output.push_str(&format!("Planning steps: {}\n", self.steps.len()));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_records_steps_in_order() {
        let mut tracer = PlanTracer::new();
        tracer.record(3, "$t[label:movie]".into(), 1.0, vec!["$t".into()]);
        tracer.record(1, "$t<-[isa]-$x".into(), 100.0, vec!["$t".into(), "$x".into()]);
        let trace = tracer.finalize();

        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[0].candidates, 3);

        let text = trace.format_trace();
        assert!(text.contains("1. $t[label:movie]"));
        assert!(text.contains("Bound: $t, $x"));
        assert!(text.contains("Total estimated cost: 101.00"));
    }
}
