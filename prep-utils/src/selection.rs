use prep_schema::{Domain, ExamQuestion, Question};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Length of a full practice exam.
pub const DEFAULT_EXAM_LENGTH: usize = 45;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainWeight {
    pub domain: Domain,
    pub percent: u32,
}

/// How an exam is split between domains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamBlueprint {
    pub weights: Vec<DomainWeight>,
    /// Shuffle the options of single-select questions with more than two
    /// options.
    #[serde(rename = "shuffleOptions", default)]
    pub shuffle_options: bool,
}

impl Default for ExamBlueprint {
    fn default() -> Self {
        let weights = [
            (Domain::DefiningTheRole, 24),
            (Domain::SupportingTeamEvents, 29),
            (Domain::SupportingArtEvents, 20),
            (Domain::BuildingHighPerformingTeams, 27),
        ]
        .into_iter()
        .map(|(domain, percent)| DomainWeight { domain, percent })
        .collect();

        Self {
            weights,
            shuffle_options: false,
        }
    }
}

impl ExamBlueprint {
    /// Splits `target` seats between the domains, indexed by
    /// [`Domain::index`].
    ///
    /// Every weight gets the floor of its share; the leftover seats go to the
    /// largest fractional remainders, ties broken by domain declaration
    /// order. The result sums to `target` unless no weight is positive.
    pub fn domain_targets(&self, target: usize) -> [usize; 4] {
        let mut targets = [0; 4];
        let total: u128 = self.weights.iter().map(|w| u128::from(w.percent)).sum();
        if total == 0 || target == 0 {
            return targets;
        }

        let mut assigned = 0;
        let mut remainders: Vec<(usize, u128)> = Vec::with_capacity(self.weights.len());
        for weight in &self.weights {
            let exact = target as u128 * u128::from(weight.percent);
            let share = (exact / total) as usize;
            targets[weight.domain.index()] += share;
            assigned += share;
            remainders.push((weight.domain.index(), exact % total));
        }

        remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for (index, _) in remainders
            .into_iter()
            .take(target.saturating_sub(assigned))
        {
            targets[index] += 1;
        }

        targets
    }
}

/// Draws `target` questions from `pool`, weighted by domain.
///
/// Each domain contributes a uniform random sample sized by
/// [`ExamBlueprint::domain_targets`]. Seats a domain cannot fill go, one at a
/// time, to the domain with the most unselected questions left. If the whole
/// pool is smaller than `target`, all of it is returned. The result is
/// shuffled.
pub fn select_exam_questions<R>(
    pool: &[ExamQuestion],
    target: usize,
    blueprint: &ExamBlueprint,
    rng: &mut R,
) -> Vec<ExamQuestion>
where
    R: Rng + ?Sized,
{
    if target == 0 || pool.is_empty() {
        return Vec::new();
    }
    if target > pool.len() {
        warn!(
            available = pool.len(),
            target, "pool smaller than exam length, drawing all of it"
        );
    }
    let target = target.min(pool.len());

    let mut by_domain: [Vec<&ExamQuestion>; 4] = Default::default();
    for question in pool {
        by_domain[question.domain().index()].push(question);
    }
    for group in by_domain.iter_mut() {
        group.shuffle(rng);
    }

    let targets = blueprint.domain_targets(target);
    debug!(?targets, "domain targets");

    let mut taken = [0; 4];
    for (i, group) in by_domain.iter().enumerate() {
        taken[i] = targets[i].min(group.len());
        if taken[i] < targets[i] {
            debug!(
                domain = %Domain::ALL[i],
                available = group.len(),
                target = targets[i],
                "not enough questions in domain"
            );
        }
    }

    let mut selected: usize = taken.iter().sum();
    while selected < target {
        // Largest remaining pool first, ties by declaration order
        let Some(i) = (0..by_domain.len())
            .filter(|&i| by_domain[i].len() > taken[i])
            .max_by(|&a, &b| {
                let remaining_a = by_domain[a].len() - taken[a];
                let remaining_b = by_domain[b].len() - taken[b];
                remaining_a.cmp(&remaining_b).then(b.cmp(&a))
            })
        else {
            break;
        };
        trace!(domain = %Domain::ALL[i], "redistributing seat");
        taken[i] += 1;
        selected += 1;
    }

    let mut exam: Vec<ExamQuestion> = by_domain
        .iter()
        .zip(taken)
        .flat_map(|(group, n)| group[..n].iter().map(|q| (*q).clone()))
        .collect();
    exam.shuffle(rng);

    if blueprint.shuffle_options {
        for question in exam.iter_mut() {
            shuffle_options(question, rng);
        }
    }

    debug!(selected = exam.len(), ?taken, "selected exam questions");

    exam
}

/// Reorders the options of a single-select question with more than two
/// options, keeping `correct_index` on the same option. Multi-select and
/// malformed questions are left untouched.
pub fn shuffle_options<C, R>(question: &mut Question<C>, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if question.is_multi_select() || question.options.len() <= 2 {
        return;
    }

    let mut order: Vec<usize> = (0..question.options.len()).collect();
    order.shuffle(rng);

    let Some(correct_index) = order.iter().position(|&i| i == question.correct_index) else {
        return;
    };
    question.options = order
        .iter()
        .map(|&i| question.options[i].clone())
        .collect();
    question.correct_index = correct_index;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use prep_schema::Provenance;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn question(id: usize, domain: Domain) -> ExamQuestion {
        Question {
            id: id.to_string(),
            question_text: format!("question {id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: id % 4,
            correct_indices: None,
            multi_select: None,
            category: domain,
            source: Provenance::BuiltIn,
        }
    }

    fn pool(counts: [usize; 4]) -> Vec<ExamQuestion> {
        let mut id = 0;
        let mut pool = Vec::new();
        for (domain, count) in Domain::ALL.into_iter().zip(counts) {
            for _ in 0..count {
                pool.push(question(id, domain));
                id += 1;
            }
        }
        pool
    }

    fn domain_counts(exam: &[ExamQuestion]) -> [usize; 4] {
        let mut counts = [0; 4];
        for q in exam {
            counts[q.domain().index()] += 1;
        }
        counts
    }

    #[test]
    fn default_blueprint_splits_45_into_11_13_9_12() {
        assert_eq!(ExamBlueprint::default().domain_targets(45), [11, 13, 9, 12]);
    }

    #[test]
    fn domain_targets_always_sum_to_target() {
        let blueprints = [
            ExamBlueprint::default(),
            ExamBlueprint {
                weights: Domain::ALL
                    .into_iter()
                    .map(|domain| DomainWeight { domain, percent: 25 })
                    .collect(),
                shuffle_options: false,
            },
            ExamBlueprint {
                weights: vec![
                    DomainWeight {
                        domain: Domain::DefiningTheRole,
                        percent: 1,
                    },
                    DomainWeight {
                        domain: Domain::SupportingArtEvents,
                        percent: 2,
                    },
                ],
                shuffle_options: false,
            },
        ];
        for blueprint in &blueprints {
            for target in 0..200 {
                assert_eq!(
                    blueprint.domain_targets(target).iter().sum::<usize>(),
                    target
                );
            }
        }
    }

    #[test]
    fn remainder_ties_go_to_earlier_domains() {
        let blueprint = ExamBlueprint {
            weights: Domain::ALL
                .into_iter()
                .map(|domain| DomainWeight { domain, percent: 25 })
                .collect(),
            shuffle_options: false,
        };
        assert_eq!(blueprint.domain_targets(6), [2, 2, 1, 1]);
        assert_eq!(blueprint.domain_targets(3), [1, 1, 1, 0]);
    }

    #[test]
    fn zero_weights_fill_from_largest_pools() {
        let blueprint = ExamBlueprint {
            weights: Vec::new(),
            shuffle_options: false,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let exam = select_exam_questions(&pool([2, 6, 1, 1]), 4, &blueprint, &mut rng);
        assert_eq!(domain_counts(&exam), [0, 4, 0, 0]);
    }

    #[test]
    fn exact_pool_is_returned_whole() {
        let pool = pool([11, 13, 9, 12]);
        let mut rng = StdRng::seed_from_u64(1);
        let exam = select_exam_questions(&pool, 45, &ExamBlueprint::default(), &mut rng);

        assert_eq!(exam.len(), 45);
        assert_eq!(domain_counts(&exam), [11, 13, 9, 12]);
        let ids: HashSet<&str> = exam.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 45);
    }

    #[test]
    fn shortfall_goes_to_domain_with_most_left() {
        // Domain 2 wants 9 but has 3
        let pool = pool([11, 20, 3, 14]);
        let mut rng = StdRng::seed_from_u64(2);
        let exam = select_exam_questions(&pool, 45, &ExamBlueprint::default(), &mut rng);

        assert_eq!(exam.len(), 45);
        // Leftovers after the targets are [0, 7, 0, 2]. Domain 1 keeps the
        // larger pool, and wins the tie with domain 3 at two left.
        assert_eq!(domain_counts(&exam), [11, 19, 3, 12]);
    }

    #[test]
    fn small_pool_returns_everything() {
        let pool = pool([3, 2, 0, 1]);
        let mut rng = StdRng::seed_from_u64(3);
        let exam = select_exam_questions(&pool, 45, &ExamBlueprint::default(), &mut rng);
        assert_eq!(exam.len(), 6);
    }

    #[test]
    fn huge_target_returns_whole_pool() {
        let pool = pool([1, 1, 1, 1]);
        let mut rng = StdRng::seed_from_u64(11);
        let exam = select_exam_questions(&pool, usize::MAX, &ExamBlueprint::default(), &mut rng);
        assert_eq!(exam.len(), 4);
        assert_eq!(domain_counts(&exam), [1, 1, 1, 1]);
    }

    #[test]
    fn domain_targets_do_not_overflow() {
        let targets = ExamBlueprint::default().domain_targets(usize::MAX);
        let total = targets
            .iter()
            .try_fold(0usize, |acc, &t| acc.checked_add(t));
        assert_eq!(total, Some(usize::MAX));
    }

    #[test]
    fn empty_pool_or_zero_target_is_empty() {
        let mut rng = StdRng::seed_from_u64(4);
        let blueprint = ExamBlueprint::default();
        assert!(select_exam_questions(&[], 45, &blueprint, &mut rng).is_empty());
        assert!(select_exam_questions(&pool([5, 5, 5, 5]), 0, &blueprint, &mut rng).is_empty());
    }

    #[test]
    fn output_is_not_grouped_by_domain() {
        let pool = pool([30, 30, 30, 30]);
        let mut rng = StdRng::seed_from_u64(9);
        let exam = select_exam_questions(&pool, 45, &ExamBlueprint::default(), &mut rng);
        let domains: Vec<Domain> = exam.iter().map(|q| q.domain()).collect();
        let mut grouped = domains.clone();
        grouped.sort();
        assert_ne!(domains, grouped);
    }

    #[test]
    fn multi_select_questions_pass_through_unchanged() {
        let mut pool = pool([11, 13, 9, 12]);
        pool[0].correct_indices = Some(vec![1, 2]);
        pool[0].multi_select = Some(2);
        let original = pool[0].clone();
        let blueprint = ExamBlueprint {
            shuffle_options: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(6);

        let exam = select_exam_questions(&pool, 45, &blueprint, &mut rng);
        let drawn = exam.iter().find(|q| q.id == original.id).unwrap();
        assert_eq!(drawn, &original);
    }

    #[test]
    fn shuffled_options_keep_the_correct_answer() {
        let mut rng = StdRng::seed_from_u64(8);
        for id in 0..50 {
            let original = question(id, Domain::SupportingArtEvents);
            let mut shuffled = original.clone();
            shuffle_options(&mut shuffled, &mut rng);
            assert_eq!(
                shuffled.options[shuffled.correct_index],
                original.options[original.correct_index]
            );
            let mut sorted = shuffled.options.clone();
            sorted.sort();
            assert_eq!(sorted, original.options);
        }
    }

    #[test]
    fn two_option_and_malformed_questions_keep_their_options() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut two = question(0, Domain::DefiningTheRole);
        two.options.truncate(2);
        let before = two.clone();
        shuffle_options(&mut two, &mut rng);
        assert_eq!(two, before);

        let mut malformed = question(1, Domain::DefiningTheRole);
        malformed.correct_index = 9;
        let before = malformed.clone();
        shuffle_options(&mut malformed, &mut rng);
        assert_eq!(malformed, before);
    }
}
