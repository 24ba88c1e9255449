//! Bandit policies for online article recommendation: a uniform-random
//! baseline, epsilon-greedy, Beta-Bernoulli Thompson Sampling, and disjoint
//! LinUCB behind a common `Policy` trait.

pub mod epsilon_greedy;
pub mod linucb;
pub mod policy;
pub mod random_choice;
pub mod thompson_sampling;

pub use epsilon_greedy::EpsilonGreedy;
pub use linucb::LinUCB;
pub use policy::Policy;
pub use random_choice::RandomChoice;
pub use thompson_sampling::ThompsonSampling;
