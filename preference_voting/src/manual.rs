/*!

This is the long-form manual for `preference_voting` and `prefvote`.

## Ballots

A ballot holds one cell per candidate, in the order the candidates were
registered. A cell is the rank the voter gave to that candidate:

```text
Timestamp,Voter,Alice,Bob,Carol
2024-03-01 10:00,ann,1,3,2
2024-03-01 10:02,bob,2,1,
```

Before counting, each ballot is normalized:
- a cell is read by its leading integer (`2`, `2.0` and `2nd` all mean 2);
  anything else is unranked;
- ranks outside `1..=N` (N candidates) are unranked;
- the remaining ranks are renumbered `1, 2, 3...` in order, so `1, 2, 5`
  becomes `1, 2, 3`. Equal ranks keep the column order: the candidate on the
  left is preferred;
- cells beyond the N candidate columns are ignored.

When a voter submits several ballots, only the last one counts and it takes
the place of the first one in the ballot order. This can be turned off with
the `keepAll` rule for anonymous polls.

## Instant runoff

Each round, every ballot counts for its highest ranked candidate that is still
in the race. Ballots with no such candidate are exhausted and leave the count.

- A candidate with more than half of the continuing ballots wins.
- If only one candidate is left, that candidate wins.
- Otherwise the candidate with the fewest votes is eliminated.

When several candidates share the fewest votes, the tie-break chain runs over
them:

1. the candidates ranked second on the fewest ballots stay tied, the others
   are spared. A single candidate left is eliminated ("fewest second choice
   votes");
2. among those, the candidates ranked last on the most ballots stay tied. A
   single candidate left is eliminated ("most last-place votes");
3. otherwise the count stops and reports the tie for manual review.

Both counts look at the ballots as submitted (after normalization), not at
the ballots re-ranked over the remaining candidates.

## Pairwise methods

The pairwise methods read a matrix where `m[i][j]` is the number of ballots
ranking candidate `i` above candidate `j`. A candidate that a ballot does not
rank takes no part in that ballot's comparisons.

| Method       | Winner                                              | Score                                |
|--------------|-----------------------------------------------------|--------------------------------------|
| Condorcet    | beats every other candidate head to head            | head-to-head wins                    |
| Schulze      | beats every other candidate on strongest paths      | sum of strongest path strengths      |
| Ranked Pairs | the only source of the locked graph                 | outgoing minus incoming locked edges |
| Minimax      | the only candidate with the smallest worst defeat   | worst defeat (smaller is better)     |

Any of them may end without a winner; the ranking is still reported.
Candidates with equal scores are listed in registration order.

## Configuration

`prefvote` reads an optional configuration file in JSON:

```json
{
  "outputSettings": {
    "contestName": "Board election",
    "outputDirectory": "results"
  },
  "candidates": [{ "name": "Alice" }, { "name": "Bob" }, { "name": "Carol" }],
  "responseSource": {
    "provider": "csv",
    "filePath": "responses.csv",
    "voterColumnIndex": 2,
    "firstRankColumnIndex": 3,
    "firstRowIndex": 2
  },
  "rules": {
    "duplicateVoters": "keepLatest",
    "methods": ["instantRunoff", "condorcet", "schulze", "rankedPairs", "minimax"]
  }
}
```

- `candidates` is optional. When missing, the candidate names are read from
  the header row above `firstRowIndex`, starting at `firstRankColumnIndex`.
- Column indexes are 1-based numbers or Excel letters (`"C"`).
- `provider` is `csv` or `xlsx`. For Excel files, `excelWorksheetName` selects
  the worksheet; it may be left out when the workbook has a single sheet.
- `voterColumnIndex`, `firstRankColumnIndex` and `firstRowIndex` default to
  the form-responses layout: voter name in column 2, ranks from column 3,
  ballots from row 2. Header cells such as `Rank the candidates [Alice]`
  give the candidate `Alice`.
- `provider` may be left out when the file extension is `.csv` or `.xlsx`.
- With `"duplicateVoters": "keepAll"` every row counts as a distinct ballot,
  whatever the voter column holds.
- `methods` may be left out to run all five methods.

 */
