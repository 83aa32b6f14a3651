//! Embedded connection matrix used when no `--connections` file is given.
//!
//! A stride-5 matrix over the first 16 hosts: host `i` talks to
//! `(i + 5) % 16`.  Sixteen hosts is a radix-4 fabric, so the matrix fits
//! every valid radix.

pub const CONNECTIONS_CSV: &str = "\
source,destination\n\
0,5\n\
1,6\n\
2,7\n\
3,8\n\
4,9\n\
5,10\n\
6,11\n\
7,12\n\
8,13\n\
9,14\n\
10,15\n\
11,0\n\
12,1\n\
13,2\n\
14,3\n\
15,4\n\
";
