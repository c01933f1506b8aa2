/*!

This is the long-form manual for `approval_voting` and `avstrat`.

## The model

The analysis follows the Fishburn-Brams treatment of approval voting with a
runoff round. One *focal voter* is singled out. Everything else is fixed:

* the candidate list;
* the *base votes*: how many approvals every candidate already collected from
  the other voters;
* the *matchups*: for some ordered pairs of candidates, who would win a
  head-to-head runoff between them.

The focal voter may cast any approval ballot, that is any subset of the
candidates. Approving everyone changes nothing compared with abstaining, so
the enumeration covers every subset except the full one: `2^n - 1` ballots
for `n` candidates, abstention included.

For each ballot the outcome engine computes the set of candidates who could
still win the election, written Γ (gamma):

* In **approval** mode, Γ is the set of candidates with the top tally.
* In **runoff** mode, the two finalists are drawn from the top of the tally.
  A single leader is certain to qualify (the `A` set); the candidates tied
  right below contend for the remaining slot (the `B` set); a tie for first
  leaves everyone in the tie contending. Every possible pairing is resolved
  through the matchup table. A pair with no recorded direction is *undefined*
  and both of its candidates stay in Γ: missing information is treated as
  uncertainty, never as a coin flip.

Outcome sets are then ordered from the voter's point of view. Two outcomes
with equal Γ are indifferent. A sure winner `{x}` measured against `{x, y}`
reduces to comparing `x` with `y`: certainty of the better candidate beats a
chance of the worse one, and a chance at the better candidate beats certainty
of the worse one. In the remaining cases the best reachable rank decides,
then the worst reachable rank.

A *sincere* ballot approves a top-`k` prefix of the voter's preference order
with no gap. Whether abstention is sincere is a modeling choice, controlled
by configuration. The analysis reports the insincere ballots whose outcome
strictly beats the outcome of every sincere ballot; the scenario is
*manipulable* when at least one exists.

## Scenario files

`avstrat` reads a scenario in JSON:

```text
{
  "contestName": "Compromise example",
  "candidates": ["A", "B", "C"],
  "baseVotes": { "A": 5, "B": 4, "C": 4 },
  "matchups": [ { "winner": "A", "loser": "B" } ],
  "preference": ["A", "C", "B"],
  "rules": { "mode": "runoff", "abstentionIsSincere": true }
}
```

* `contestName` (string, optional): a label echoed in the summary.
* `candidates` (array of strings): the candidate list, without duplicates.
* `baseVotes` (object, optional keys): approvals per candidate from the other
  voters. Candidates not listed count as zero.
* `matchups` (array of `{winner, loser}` objects): the defined head-to-head
  results. Listing both directions for the same pair is rejected.
* `preference` (array of strings): the focal voter's order, most preferred
  first. It must be a permutation of `candidates`.
* `rules.mode` (string): `approval` or `runoff`.
* `rules.abstentionIsSincere` (boolean, default true).

## Output

The summary is printed to the standard output in JSON and can be written to a
file with `--out`. Ballots are rendered as `∅ (abstain)` or `{A, B}`; a Γ set
is rendered as the bare candidate name when it is a singleton, `undefined`
when it is empty, and `{A, B}` otherwise. Each enumerated ballot yields one
entry with its Γ and its sincerity flag, followed by the list of dominant
insincere ballots and the final `manipulable` verdict.

With `--reference`, the summary is compared against a reference file and the
program fails if they differ. This is how the scenario tests in the
repository are checked.

 */
