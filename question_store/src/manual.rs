/*!

This is the long-form manual for `question_store` and the `qtagger` service.

## Input format

The input is a survey export in the Qualtrics CSV format: comma separated, UTF-8 encoded.

|            | column 1       | column 2          | ... |
|------------|----------------|-------------------|-----|
| row 1      | `QID1`         | `QID2`            |     |
| row 2      | `Are you 18+?` | `Favorite color?` |     |
| row 3      | `Yes`          | `Blue`            |     |
| row 4      | `No`           | `Red`             |     |

- The first row holds internal identifiers. They are only used to know how many columns
  there are, and never appear in the output.
- The second row holds the text of each question. It becomes the key of the question.
- All the following rows are responses. They are collected in order under `options`.

The example above becomes:

```json
{
  "Are you 18+?": {"options": ["Yes", "No"], "type": null},
  "Favorite color?": {"options": ["Blue", "Red"], "type": null}
}
```

### Leniency

By default, the reader does not validate the shape of the export:
- a row shorter than the header does not contribute to the missing columns
- the question text of a column is its first value: if the second row is too short to reach a
  column, the next row that does reach it supplies the question text
- cells beyond the length of the header are dropped
- a column with no value at all, or whose question text is empty, is dropped
- when two columns have the same question text, the rightmost one is kept (at the position
  of the leftmost one)

The only hard failure is an input without any row. With the strict option (`--strict` for
`qtagger`), any row whose length differs from the header is rejected as well.

Note that Qualtrics exports usually carry a third row with import identifiers
(`{"ImportId":"QID1"}`). It is read as a response like any other row.

## Annotating questions

After an export has been loaded, each question can be tagged with a type. The type is a free
string (`likert`, `multiple_choice`, `text`, ...), no vocabulary is enforced.

## HTTP interface

`qtagger` serves the following routes:

| Route                       | Body                                   | Response                                      |
|-----------------------------|----------------------------------------|-----------------------------------------------|
| `POST /upload`              | multipart form with a `file` field     | `{"message": "CSV loaded", "questions": [...]}` |
| `GET /questions`            |                                        | the whole store, as above                     |
| `POST /questions/set-type`  | `{"question": "...", "type": "..."}`   | `{"message": "...", "question": {...}}`        |
| `OPTIONS /upload`           |                                        | 204, empty                                    |
| `GET /health`               |                                        | `{"status": "healthy", ...}`                  |

Errors are returned as `{"error": "..."}`: 400 for a missing file, an empty file name, an
unreadable export or a malformed request body, 404 for an unknown question, 413 for an upload
over the size limit.

Each upload replaces all the questions (and their types) loaded so far. Nothing is kept
when the service stops.

*/
