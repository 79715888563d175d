use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Float;

/// A struct that holds the results of a swarm run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SwarmSummary {
    /// The names of the parameters. This is `None` if no names were set.
    pub parameter_names: Option<Vec<String>>,
    /// A message describing why the run stopped.
    pub message: String,
    /// The selected best position.
    pub x: Vec<Float>,
    /// The objective value at [`SwarmSummary::x`].
    pub fx: Float,
    /// The number of steps taken.
    pub n_steps: usize,
    /// The number of objective evaluations.
    pub cost_evals: usize,
    /// Flag that says whether or not the run met its convergence criterion.
    pub converged: bool,
    /// The number of particles in the swarm.
    pub n_particles: usize,
    /// The positions of every frozen particle, in particle order.
    pub frozen: Vec<Vec<Float>>,
}

impl SwarmSummary {
    /// Set the names associated with each parameter.
    pub fn with_parameter_names(mut self, parameter_names: &[String]) -> Self {
        self.parameter_names = Some(parameter_names.to_vec());
        self
    }
    /// The number of particles which froze during the run.
    pub fn n_frozen(&self) -> usize {
        self.frozen.len()
    }
    /// The fraction of the swarm which froze during the run.
    pub fn frozen_fraction(&self) -> Float {
        if self.n_particles == 0 {
            0.0
        } else {
            self.frozen.len() as Float / self.n_particles as Float
        }
    }
}

impl Display for SwarmSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "╒══════════════════════════════════════════════════════════════════════╕"
        )?;
        writeln!(f, "│{:^70}│", "SWARM RESULTS")?;
        writeln!(
            f,
            "╞══════════════════════════════════╤═══════════════════════════════════╡"
        )?;
        writeln!(
            f,
            "│ Status: {:<25}│ f(x): {:<+28.5E}│",
            if self.converged {
                "Converged"
            } else {
                "Not Converged"
            },
            self.fx
        )?;
        writeln!(
            f,
            "│ Steps: {:<26}│ #f(x): {:<27}│",
            self.n_steps, self.cost_evals
        )?;
        writeln!(
            f,
            "│ Frozen: {:<25}│ Particles: {:<23}│",
            self.n_frozen(),
            self.n_particles
        )?;
        writeln!(
            f,
            "├──────────────────────────────────┴───────────────────────────────────┤"
        )?;
        writeln!(f, "│ Message: {:<60}│", self.message)?;
        writeln!(
            f,
            "├──────────────────────────────────┬───────────────────────────────────┤"
        )?;
        writeln!(f, "│ {:<33}│ {:<34}│", "Parameter", "Value")?;
        writeln!(
            f,
            "├──────────────────────────────────┼───────────────────────────────────┤"
        )?;
        for (i, xi) in self.x.iter().enumerate() {
            let name = self
                .parameter_names
                .as_ref()
                .and_then(|names| names.get(i).cloned())
                .unwrap_or_else(|| format!("x_{}", i));
            writeln!(f, "│ {:<33}│ {:<+34.8E}│", name, xi)?;
        }
        write!(
            f,
            "└──────────────────────────────────┴───────────────────────────────────┘"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_named_parameters() {
        let summary = SwarmSummary {
            x: vec![7.39, -3.39],
            fx: 1e-6,
            n_particles: 4,
            frozen: vec![vec![7.39, -3.39]],
            converged: true,
            message: "FROZEN FRACTION".to_string(),
            ..Default::default()
        }
        .with_parameter_names(&["T".to_string(), "P".to_string()]);
        let out = format!("{}", summary);
        assert!(out.contains("Converged"));
        assert!(out.contains("FROZEN FRACTION"));
        assert!(out.contains("│ T "));
        assert!(out.contains("│ P "));
        assert_eq!(summary.n_frozen(), 1);
        assert_eq!(summary.frozen_fraction(), 0.25);
    }
}
